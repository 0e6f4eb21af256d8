//! Setup form: the four study fields and the submission gate.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TimingsConfig;
use crate::deferred::{Deferred, Ticket};
use crate::event::{EventSender, SessionEvent};
use crate::generation::{generate_with_timeout, ProtocolGenerator};

/// Study metadata collected by the setup form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputs {
    pub title: String,
    pub objective: String,
    pub disease_area: String,
    pub study_type: String,
}

/// The fields of `FormInputs`, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Title,
    Objective,
    DiseaseArea,
    StudyType,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Objective,
        FormField::DiseaseArea,
        FormField::StudyType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Study Title",
            FormField::Objective => "Study Objective",
            FormField::DiseaseArea => "Disease Area",
            FormField::StudyType => "Study Type",
        }
    }

    /// Free-text fields are edited by typing; the others pick from an option set
    pub fn is_free_text(&self) -> bool {
        matches!(self, FormField::Title | FormField::Objective)
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FormInputs {
    pub fn new(
        title: impl Into<String>,
        objective: impl Into<String>,
        disease_area: impl Into<String>,
        study_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            objective: objective.into(),
            disease_area: disease_area.into(),
            study_type: study_type.into(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Objective => &self.objective,
            FormField::DiseaseArea => &self.disease_area,
            FormField::StudyType => &self.study_type,
        }
    }

    fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Objective => &mut self.objective,
            FormField::DiseaseArea => &mut self.disease_area,
            FormField::StudyType => &mut self.study_type,
        }
    }

    /// Fields that block submission. Free text is trimmed first; selects
    /// only need a value.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| {
                let value = self.get(*field);
                if field.is_free_text() {
                    value.trim().is_empty()
                } else {
                    value.is_empty()
                }
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    /// Accepted; waiting for the deferred transition to the workspace
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// At least one field is empty. Nothing changed.
    Rejected,
    /// A submission is already pending
    AlreadySubmitting,
}

/// The setup screen's state: its own `FormInputs` plus the submit gate
#[derive(Debug)]
pub struct SetupForm {
    inputs: FormInputs,
    phase: FormPhase,
    pending: Option<Deferred>,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self::new(FormInputs::default())
    }
}

impl SetupForm {
    pub fn new(inputs: FormInputs) -> Self {
        Self {
            inputs,
            phase: FormPhase::Editing,
            pending: None,
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Editing && self.inputs.is_complete()
    }

    /// Mutable access to a field while the form is still editable
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match self.phase {
            FormPhase::Editing => Some(self.inputs.get_mut(field)),
            FormPhase::Submitting => None,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self.field_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Step a select field through its option set.
    ///
    /// An empty or unknown value moves to the first option (or the last when
    /// stepping backwards).
    pub fn cycle_option(&mut self, field: FormField, options: &[String], forward: bool) -> bool {
        if options.is_empty() {
            return false;
        }
        let current = options.iter().position(|o| o == self.inputs.get(field));
        let next = match (current, forward) {
            (Some(idx), true) => (idx + 1) % options.len(),
            (Some(idx), false) => (idx + options.len() - 1) % options.len(),
            (None, true) => 0,
            (None, false) => options.len() - 1,
        };
        self.set_field(field, options[next].clone())
    }

    /// Gate and start a submission.
    ///
    /// On acceptance one deferred task waits the submit delay while the
    /// generator runs, then sends `SessionEvent::SubmissionReady`.
    pub fn submit(
        &mut self,
        generator: &Arc<dyn ProtocolGenerator>,
        timings: &TimingsConfig,
        events: &EventSender,
    ) -> SubmitOutcome {
        if self.phase == FormPhase::Submitting {
            return SubmitOutcome::AlreadySubmitting;
        }
        if !self.inputs.is_complete() {
            debug!(missing = ?self.inputs.missing_fields(), "submit rejected");
            return SubmitOutcome::Rejected;
        }

        let inputs = self.inputs.clone();
        let generator = Arc::clone(generator);
        let events = events.clone();
        let delay = timings.submit_delay();
        let timeout = timings.generation_timeout();

        let deferred = Deferred::spawn(move |ticket| async move {
            let (_, generated) = tokio::join!(
                tokio::time::sleep(delay),
                generate_with_timeout(generator.as_ref(), &inputs, timeout)
            );
            let _ = events.send(SessionEvent::SubmissionReady {
                ticket,
                inputs,
                generated,
            });
        });

        info!(title = %self.inputs.title, delay_ms = delay.as_millis() as u64, "submission accepted");
        self.phase = FormPhase::Submitting;
        self.pending = Some(deferred);
        SubmitOutcome::Accepted
    }

    /// Whether a completion with this ticket belongs to the pending submission
    pub fn owns(&self, ticket: Ticket) -> bool {
        self.pending.as_ref().map(Deferred::ticket) == Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockGenerator;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn complete() -> FormInputs {
        FormInputs::new("T", "O", "Oncology", "Phase II Clinical Trial")
    }

    #[test]
    fn test_whitespace_title_is_missing() {
        let mut inputs = complete();
        inputs.title = "   \t".into();
        assert_eq!(inputs.missing_fields(), vec![FormField::Title]);
    }

    #[test]
    fn test_empty_inputs_miss_everything() {
        assert_eq!(FormInputs::default().missing_fields(), FormField::ALL.to_vec());
    }

    #[test]
    fn test_inputs_serialize_camel_case() {
        let json = serde_json::to_value(complete()).unwrap();
        assert_eq!(json["diseaseArea"], "Oncology");
        assert_eq!(json["studyType"], "Phase II Clinical Trial");
    }

    #[test]
    fn test_field_navigation_wraps() {
        assert_eq!(FormField::StudyType.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::StudyType);
    }

    #[test]
    fn test_cycle_option() {
        let options: Vec<String> = vec!["A".into(), "B".into()];
        let mut form = SetupForm::default();

        form.cycle_option(FormField::DiseaseArea, &options, true);
        assert_eq!(form.inputs().disease_area, "A");
        form.cycle_option(FormField::DiseaseArea, &options, true);
        assert_eq!(form.inputs().disease_area, "B");
        form.cycle_option(FormField::DiseaseArea, &options, true);
        assert_eq!(form.inputs().disease_area, "A");

        form.cycle_option(FormField::StudyType, &options, false);
        assert_eq!(form.inputs().study_type, "B");
    }

    #[tokio::test]
    async fn test_rejected_submit_changes_nothing() {
        let generator: Arc<dyn ProtocolGenerator> = Arc::new(MockGenerator::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut inputs = complete();
        inputs.objective = " ".into();
        let mut form = SetupForm::new(inputs.clone());

        let outcome = form.submit(&generator, &TimingsConfig::default(), &tx);

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.inputs(), &inputs);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_submit_fires_after_delay() {
        let generator: Arc<dyn ProtocolGenerator> = Arc::new(MockGenerator::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = SetupForm::new(complete());
        let started = tokio::time::Instant::now();

        assert_eq!(
            form.submit(&generator, &TimingsConfig::default(), &tx),
            SubmitOutcome::Accepted
        );
        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(!form.set_field(FormField::Title, "changed"));
        assert_eq!(
            form.submit(&generator, &TimingsConfig::default(), &tx),
            SubmitOutcome::AlreadySubmitting
        );

        match rx.recv().await {
            Some(SessionEvent::SubmissionReady { ticket, inputs, generated }) => {
                assert!(form.owns(ticket));
                assert_eq!(inputs, complete());
                assert!(generated.is_ok());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(started.elapsed() >= Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_form_cancels_transition() {
        let generator: Arc<dyn ProtocolGenerator> = Arc::new(MockGenerator::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = SetupForm::new(complete());
        form.submit(&generator, &TimingsConfig::default(), &tx);
        drop(form);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
