//! Interactive application state around a `Session`

use std::path::PathBuf;

use protogen_core::{
    Activation, FormField, Handled, Section, Session, SubmitOutcome, Theme,
};
use tracing::{error, info};

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Screen state and deferred completions
    pub session: Session,
    /// Field with keyboard focus on the setup screen
    pub focused_field: FormField,
    /// Highlighted card on the workspace screen
    pub selected_card: Section,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    pub theme: Theme,
    /// Where `d` writes the report
    pub export_dir: PathBuf,
    /// Frame counter for spinners
    pub tick: usize,
}

impl App {
    pub fn new(session: Session) -> Self {
        let theme = session.config().ui.theme;
        let export_dir = session.config().export.output_dir();
        Self {
            session,
            focused_field: FormField::Title,
            selected_card: Section::Abstract,
            status_message: None,
            should_quit: false,
            theme,
            export_dir,
            tick: 0,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Apply every deferred completion that has arrived
    pub fn apply_pending(&mut self) {
        while let Some(event) = self.session.try_next_event() {
            match self.session.handle(event) {
                Handled::Navigated => {
                    self.selected_card = Section::Abstract;
                    self.clear_status();
                }
                Handled::CardLoaded(section) => {
                    self.set_status(format!("{} generated", section.title()));
                }
                Handled::Stale => {}
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Type into the focused free-text field
    pub fn type_char(&mut self, c: char) {
        if !self.focused_field.is_free_text() {
            return;
        }
        let field = self.focused_field;
        if let Some(value) = self.session.setup_mut().and_then(|f| f.field_mut(field)) {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field;
        if let Some(value) = self.session.setup_mut().and_then(|f| f.field_mut(field)) {
            if field.is_free_text() {
                value.pop();
            } else {
                value.clear();
            }
        }
    }

    /// Step the focused select field through its options
    pub fn cycle_option(&mut self, forward: bool) {
        let field = self.focused_field;
        let options = match field {
            FormField::DiseaseArea => self.session.config().options.disease_areas.clone(),
            FormField::StudyType => self.session.config().options.study_types.clone(),
            FormField::Title | FormField::Objective => return,
        };
        if let Some(form) = self.session.setup_mut() {
            form.cycle_option(field, &options, forward);
        }
    }

    /// Submit the form; an incomplete form is ignored without feedback
    pub fn submit(&mut self) {
        if self.session.submit() == SubmitOutcome::Accepted {
            self.set_status("Analyzing past protocols…");
        }
    }

    pub fn select_next_card(&mut self) {
        let next = (self.selected_card.index() + 1) % Section::ALL.len();
        self.selected_card = Section::ALL[next];
    }

    pub fn select_prev_card(&mut self) {
        let len = Section::ALL.len();
        let prev = (self.selected_card.index() + len - 1) % len;
        self.selected_card = Section::ALL[prev];
    }

    pub fn activate(&mut self, section: Section) {
        self.selected_card = section;
        if let Some(Activation::StartLoad) = self.session.activate(section) {
            self.set_status(format!("Generating {}…", section.title()));
        }
    }

    pub fn back_to_setup(&mut self) {
        self.session.back_to_setup();
        self.focused_field = FormField::Title;
        self.clear_status();
    }

    /// Write the report for the current workspace
    pub fn download(&mut self) {
        let Some(workspace) = self.session.workspace() else {
            return;
        };
        match workspace.report().export_to(&self.export_dir) {
            Ok(path) => {
                info!(path = %path.display(), "report downloaded from workspace");
                self.set_status(format!("Report saved to {}", path.display()));
            }
            Err(err) => {
                error!(error = %err, "report export failed");
                self.set_status(format!("Export failed: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protogen_core::{MockGenerator, ProtogenConfig};
    use std::sync::Arc;

    fn app() -> App {
        App::new(Session::new(
            ProtogenConfig::default(),
            Arc::new(MockGenerator::new()),
        ))
    }

    #[test]
    fn test_typing_only_edits_free_text() {
        let mut app = app();
        app.type_char('T');
        app.focus_next();
        app.type_char('O');
        app.focus_next();
        app.type_char('x');

        let inputs = app.session.setup().unwrap().inputs();
        assert_eq!(inputs.title, "T");
        assert_eq!(inputs.objective, "O");
        assert_eq!(inputs.disease_area, "");
    }

    #[test]
    fn test_cycle_select_and_clear() {
        let mut app = app();
        app.focused_field = FormField::StudyType;
        app.cycle_option(true);
        assert_eq!(
            app.session.setup().unwrap().inputs().study_type,
            "Phase I Clinical Trial"
        );
        app.backspace();
        assert_eq!(app.session.setup().unwrap().inputs().study_type, "");
    }

    #[test]
    fn test_incomplete_submit_is_silent() {
        let mut app = app();
        app.submit();
        assert!(app.status_message.is_none());
        assert!(!app.session.setup().unwrap().can_submit());
    }

    #[test]
    fn test_card_selection_wraps() {
        let mut app = app();
        app.select_prev_card();
        assert_eq!(app.selected_card, Section::Methodology);
        app.select_next_card();
        assert_eq!(app.selected_card, Section::Abstract);
    }
}
