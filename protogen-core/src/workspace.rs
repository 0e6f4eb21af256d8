//! Workspace screen model: generated title, similar protocols and the
//! three section cards for one accepted submission.

use tracing::warn;

use crate::card::{Activation, ContentCard};
use crate::config::TimingsConfig;
use crate::deferred::Ticket;
use crate::error::Result;
use crate::event::EventSender;
use crate::form::FormInputs;
use crate::generation::{generated_title, GeneratedProtocol, Section};
use crate::report::ProtocolReport;
use crate::similar::SimilarProtocolEntry;

#[derive(Debug)]
pub struct Workspace {
    inputs: FormInputs,
    generated: Option<GeneratedProtocol>,
    failure: Option<String>,
    cards: [ContentCard; 3],
}

impl Workspace {
    /// Build the workspace for accepted inputs and the generator's outcome.
    ///
    /// A failed generation still opens the workspace; cards then reveal
    /// their placeholders and the similar list is empty.
    pub fn new(inputs: FormInputs, generated: Result<GeneratedProtocol>) -> Self {
        let (generated, failure) = match generated {
            Ok(generated) => (Some(generated), None),
            Err(err) => {
                warn!(error = %err, "generation failed, using placeholders");
                (None, Some(err.to_string()))
            }
        };

        let cards = Section::ALL.map(|section| {
            let source = generated.as_ref().map(|g| g.section(section).to_string());
            ContentCard::new(section, source)
        });

        Self {
            inputs,
            generated,
            failure,
            cards,
        }
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn title(&self) -> String {
        self.generated
            .as_ref()
            .map(|g| g.title.clone())
            .unwrap_or_else(|| generated_title(&self.inputs))
    }

    pub fn similar(&self) -> &[SimilarProtocolEntry] {
        self.generated
            .as_ref()
            .map(|g| g.similar.as_slice())
            .unwrap_or(&[])
    }

    pub fn generation_failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Status banner headline and detail line
    pub fn banner(&self) -> (&'static str, String) {
        match &self.failure {
            None => (
                "Analysis Complete",
                format!(
                    "Retrieved {} similar protocols • Ready to generate sections",
                    self.similar().len()
                ),
            ),
            Some(reason) => ("Generation Unavailable", reason.clone()),
        }
    }

    pub fn cards(&self) -> &[ContentCard] {
        &self.cards
    }

    pub fn card(&self, section: Section) -> &ContentCard {
        &self.cards[section.index()]
    }

    pub fn activate(
        &mut self,
        section: Section,
        timings: &TimingsConfig,
        events: &EventSender,
    ) -> Activation {
        self.cards[section.index()].activate(timings, events)
    }

    pub fn apply_card_loaded(&mut self, section: Section, ticket: Ticket, content: String) -> bool {
        self.cards[section.index()].apply_loaded(ticket, content)
    }

    /// Downloadable report for this workspace
    pub fn report(&self) -> ProtocolReport {
        ProtocolReport::new(&self.inputs, self.generated.as_ref())
    }
}
