//! UI rendering using ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use protogen_core::{
    ContentCard, FormField, FormPhase, Phase, Screen, SetupForm, Theme, Workspace,
};

use super::app::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

const DISCLAIMER: &str =
    "Generated content is AI-assisted and should be reviewed by qualified personnel before use.";

/// Colors for one theme
struct Palette {
    /// Primary accent color
    accent: Color,
    /// Secondary color for less important elements
    secondary: Color,
    /// Highlight color for selected items
    highlight: Color,
    success: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Classic => Self {
                accent: Color::Cyan,
                secondary: Color::DarkGray,
                highlight: Color::Yellow,
                success: Color::Green,
                error: Color::Red,
            },
            Theme::Neon => Self {
                accent: Color::Magenta,
                secondary: Color::Rgb(120, 60, 140),
                highlight: Color::Rgb(255, 0, 153),
                success: Color::LightGreen,
                error: Color::LightRed,
            },
        }
    }
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    let area = frame.area();

    // header + content + status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    match app.session.screen() {
        Screen::Setup(form) => {
            render_header(
                frame,
                &palette,
                chunks[0],
                "Study Protocol Generator",
                "Powered by GenAI",
            );
            if form.phase() == FormPhase::Submitting {
                render_analyzing(frame, app, &palette, chunks[1]);
            } else {
                render_setup(frame, app, form, &palette, chunks[1]);
            }
        }
        Screen::Workspace(workspace) => {
            render_header(
                frame,
                &palette,
                chunks[0],
                "Protocol Workspace",
                "AI-Generated Documentation · Esc: Back to Setup",
            );
            render_workspace(frame, app, workspace, &palette, chunks[1]);
        }
    }

    render_status_bar(frame, app, &palette, chunks[2]);
}

fn render_header(frame: &mut Frame, palette: &Palette, area: Rect, title: &str, subtitle: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.secondary));

    let paragraph = Paragraph::new(Line::from(Span::styled(subtitle, Style::default().fg(DIM))))
        .block(block);
    frame.render_widget(paragraph, area);
}

/// Setup form: two text fields, two selects, submit button
fn render_setup(frame: &mut Frame, app: &App, form: &SetupForm, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // intro
            Constraint::Length(3), // title
            Constraint::Length(5), // objective
            Constraint::Length(3), // disease area
            Constraint::Length(3), // study type
            Constraint::Length(3), // submit
            Constraint::Min(0),
        ])
        .split(area);

    let intro = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            "Create Your Study Protocol",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Tab/↑↓ move · ←/→ choose option · Enter submit · Esc quit",
            Style::default().fg(DIM),
        )),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(intro, chunks[0]);

    for (i, field) in FormField::ALL.into_iter().enumerate() {
        render_field(frame, app, form, palette, field, chunks[i + 1]);
    }

    // Rendered disabled until every field is filled
    let style = if form.can_submit() {
        Style::default()
            .fg(palette.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let button = Paragraph::new(Line::from(Span::styled("✦ Generate Report", style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if form.can_submit() {
                    Style::default().fg(palette.accent)
                } else {
                    Style::default().fg(DIM)
                }),
        );
    frame.render_widget(button, chunks[5]);
}

fn render_field(
    frame: &mut Frame,
    app: &App,
    form: &SetupForm,
    palette: &Palette,
    field: FormField,
    area: Rect,
) {
    let is_focused = app.focused_field == field;
    let value = form.inputs().get(field);

    let border_style = if is_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.secondary)
    };

    let block = Block::default()
        .title(format!(" {} ", field.label()))
        .title_style(if is_focused {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.secondary)
        })
        .borders(Borders::ALL)
        .border_style(border_style);

    let line = if value.is_empty() && !(is_focused && field.is_free_text()) {
        Line::from(Span::styled(placeholder(field), Style::default().fg(DIM)))
    } else if field.is_free_text() {
        let cursor = if is_focused { "|" } else { "" };
        Line::from(format!("{}{}", value, cursor))
    } else if is_focused {
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(palette.accent)),
            Span::raw(value.to_string()),
            Span::styled(" ▶", Style::default().fg(palette.accent)),
        ])
    } else {
        Line::from(value.to_string())
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Title => "Enter your study title...",
        FormField::Objective => "Describe the primary objective of your study...",
        FormField::DiseaseArea => "Select disease area",
        FormField::StudyType => "Select study type",
    }
}

/// Loader shown for the duration of the submit delay
fn render_analyzing(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let spinner = SPINNER[app.tick % SPINNER.len()];
    let text = Text::from(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Analyzing past protocols…", spinner),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Retrieving similar studies from research database",
            Style::default().fg(DIM),
        )),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn render_workspace(
    frame: &mut Frame,
    app: &App,
    workspace: &Workspace,
    palette: &Palette,
    area: Rect,
) {
    let similar_height = workspace.similar().len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),              // banner
            Constraint::Length(similar_height), // similar protocols
            Constraint::Length(4),              // generated title
            Constraint::Min(6),                 // cards
            Constraint::Length(1),              // disclaimer
        ])
        .split(area);

    let (headline, detail) = workspace.banner();
    let (mark, color) = match workspace.generation_failure() {
        None => ("✓", palette.success),
        Some(_) => ("✗", palette.error),
    };
    let banner = Paragraph::new(Text::from(vec![
        Line::from(Span::styled(
            format!("{} {}", mark, headline),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(detail, Style::default().fg(DIM))),
    ]));
    frame.render_widget(banner, chunks[0]);

    let items: Vec<ListItem> = workspace
        .similar()
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{} ", rank + 1), Style::default().fg(palette.accent)),
                Span::raw(entry.name.clone()),
                Span::styled(format!("  {}", entry.year), Style::default().fg(DIM)),
                Span::styled(
                    format!("  {}", entry.similarity_label()),
                    Style::default().fg(palette.success),
                ),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(" Top Similar Past Protocols ")
            .title_style(Style::default().fg(palette.accent))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.secondary)),
    );
    frame.render_widget(list, chunks[1]);

    let inputs = workspace.inputs();
    let title = Paragraph::new(Text::from(vec![
        Line::from(Span::styled("✦ Generated Study Title", Style::default().fg(palette.accent))),
        Line::from(Span::styled(
            workspace.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!(" {} ", inputs.disease_area),
                Style::default().fg(Color::Black).bg(palette.secondary),
            ),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", inputs.study_type),
                Style::default().fg(Color::Black).bg(palette.secondary),
            ),
        ]),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(title, chunks[2]);

    render_cards(frame, app, workspace, palette, chunks[3]);

    let footer = Paragraph::new(Span::styled(DISCLAIMER, Style::default().fg(DIM)))
        .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}

/// Expanded cards share the remaining height; others take three rows
fn render_cards(frame: &mut Frame, app: &App, workspace: &Workspace, palette: &Palette, area: Rect) {
    let constraints: Vec<Constraint> = workspace
        .cards()
        .iter()
        .map(|card| {
            if card.state().is_expanded() {
                Constraint::Min(5)
            } else {
                Constraint::Length(4)
            }
        })
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (card, chunk) in workspace.cards().iter().zip(chunks.iter()) {
        render_card(frame, app, card, palette, *chunk);
    }
}

fn render_card(frame: &mut Frame, app: &App, card: &ContentCard, palette: &Palette, area: Rect) {
    let section = card.section();
    let state = card.state();
    let is_selected = app.selected_card == section;

    let border_style = if is_selected {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.secondary)
    };

    let action = match state.phase() {
        Phase::Loading => format!(
            " {} {} ",
            SPINNER[app.tick % SPINNER.len()],
            state.action_label()
        ),
        Phase::Idle | Phase::Loaded => format!(" [{}] ", state.action_label()),
    };

    let block = Block::default()
        .title(format!(" {}. {} ", section.index() + 1, section.title()))
        .title_style(if is_selected {
            Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        })
        .title_bottom(Line::from(Span::styled(action, Style::default().fg(palette.accent))).right_aligned())
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines = vec![Line::from(Span::styled(
        section.description(),
        Style::default().fg(DIM),
    ))];
    if state.is_expanded() {
        if let Some(content) = state.content() {
            lines.push(Line::from(""));
            lines.extend(content.lines().map(|l| Line::from(l.to_string())));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let hints = match app.session.screen() {
        Screen::Setup(_) => "Enter:submit  Esc:quit",
        Screen::Workspace(_) => "j/k:select  Enter/1-3:generate  d:download  Esc:back  q:quit",
    };

    let line = match &app.status_message {
        Some(msg) => Line::from(vec![
            Span::styled(msg.clone(), Style::default().fg(palette.highlight)),
            Span::styled(format!("  │  {}", hints), Style::default().fg(DIM)),
        ]),
        None => Line::from(Span::styled(hints, Style::default().fg(DIM))),
    };

    frame.render_widget(Paragraph::new(line), area);
}
