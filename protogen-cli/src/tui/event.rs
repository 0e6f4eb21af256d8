//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use protogen_core::{FormPhase, Screen, Section};

use super::app::App;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Submit the setup form
    Submit,
    /// Activate a section card
    Activate(Section),
    /// Export the report
    Download,
    /// Return to the setup screen
    Back,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return HandleResult::Continue;
    }

    // Global quit shortcuts (Ctrl+C, Ctrl+Q)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            _ => return HandleResult::Continue,
        }
    }

    match app.session.screen() {
        Screen::Setup(form) if form.phase() == FormPhase::Submitting => {
            // Form is locked until navigation
            match key.code {
                KeyCode::Esc => HandleResult::Quit,
                _ => HandleResult::Continue,
            }
        }
        Screen::Setup(_) => handle_setup(app, key),
        Screen::Workspace(_) => handle_workspace(app, key),
    }
}

fn handle_setup(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => HandleResult::Quit,

        KeyCode::Tab | KeyCode::Down => {
            app.focus_next();
            HandleResult::Continue
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus_prev();
            HandleResult::Continue
        }

        // Selects
        KeyCode::Right => {
            app.cycle_option(true);
            HandleResult::Continue
        }
        KeyCode::Left => {
            app.cycle_option(false);
            HandleResult::Continue
        }

        KeyCode::Enter => HandleResult::Submit,

        KeyCode::Backspace => {
            app.backspace();
            HandleResult::Continue
        }
        KeyCode::Char(c) => {
            app.type_char(c);
            HandleResult::Continue
        }

        _ => HandleResult::Continue,
    }
}

fn handle_workspace(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => HandleResult::Quit,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
            app.select_next_card();
            HandleResult::Continue
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
            app.select_prev_card();
            HandleResult::Continue
        }

        KeyCode::Enter | KeyCode::Char(' ') => HandleResult::Activate(app.selected_card),
        KeyCode::Char('1') => HandleResult::Activate(Section::Abstract),
        KeyCode::Char('2') => HandleResult::Activate(Section::Background),
        KeyCode::Char('3') => HandleResult::Activate(Section::Methodology),

        KeyCode::Char('d') => HandleResult::Download,

        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Backspace | KeyCode::Left => {
            HandleResult::Back
        }

        _ => HandleResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protogen_core::{FormField, MockGenerator, ProtogenConfig, Session};
    use std::sync::Arc;

    fn app() -> App {
        App::new(Session::new(
            ProtogenConfig::default(),
            Arc::new(MockGenerator::new()),
        ))
    }

    fn press(app: &mut App, code: KeyCode) -> HandleResult {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = app();
        let result = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(result, HandleResult::Quit);
    }

    #[test]
    fn test_setup_keys_edit_the_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.session.setup().unwrap().inputs().title, "q");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field, FormField::DiseaseArea);
        press(&mut app, KeyCode::Right);
        assert_eq!(
            app.session.setup().unwrap().inputs().disease_area,
            "Oncology"
        );

        assert_eq!(press(&mut app, KeyCode::Enter), HandleResult::Submit);
    }
}
