//! Content card lifecycle: `Idle` → `Loading` → `Loaded`, with an
//! orthogonal `expanded` flag once the card has left `Idle`.

use tracing::debug;

use crate::config::TimingsConfig;
use crate::deferred::{Deferred, Ticket};
use crate::event::{EventSender, SessionEvent};
use crate::generation::Section;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
}

/// What an activation did to the card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Left `Idle`; the caller must schedule exactly one completion
    StartLoad,
    /// `Loaded` card flipped; carries the new `expanded` value
    Toggled(bool),
    /// Activation while `Loading`
    Ignored,
}

/// Display state of one card.
///
/// `content` is `Some` exactly when `phase == Loaded`, and `expanded` is
/// never set while `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardState {
    phase: Phase,
    expanded: bool,
    content: Option<String>,
}

impl CardState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn activate(&mut self) -> Activation {
        match self.phase {
            Phase::Idle => {
                self.expanded = true;
                self.phase = Phase::Loading;
                Activation::StartLoad
            }
            Phase::Loading => Activation::Ignored,
            Phase::Loaded => {
                self.expanded = !self.expanded;
                Activation::Toggled(self.expanded)
            }
        }
    }

    /// Apply the deferred completion. Only valid while `Loading`.
    pub fn complete(&mut self, content: String) -> bool {
        if self.phase != Phase::Loading {
            return false;
        }
        self.content = Some(content);
        self.phase = Phase::Loaded;
        true
    }

    pub fn invariant_holds(&self) -> bool {
        let content_matches = self.content.is_some() == (self.phase == Phase::Loaded);
        let expansion_matches = !self.expanded || self.phase != Phase::Idle;
        content_matches && expansion_matches
    }

    /// Footer label for the card's single action
    pub fn action_label(&self) -> &'static str {
        match (self.phase, self.expanded) {
            (Phase::Idle, _) => "Generate",
            (Phase::Loading, _) => "Generating…",
            (Phase::Loaded, true) => "Collapse",
            (Phase::Loaded, false) => "Expand",
        }
    }
}

/// A card bound to its section, its source text, and at most one pending
/// reveal.
#[derive(Debug)]
pub struct ContentCard {
    section: Section,
    state: CardState,
    /// Text handed over by the generator; `None` reveals the placeholder
    source: Option<String>,
    pending: Option<Deferred>,
}

impl ContentCard {
    pub fn new(section: Section, source: Option<String>) -> Self {
        Self {
            section,
            state: CardState::default(),
            source,
            pending: None,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a user activation, scheduling the reveal when leaving `Idle`
    pub fn activate(&mut self, timings: &TimingsConfig, events: &EventSender) -> Activation {
        let activation = self.state.activate();

        if activation == Activation::StartLoad {
            let delay = timings.card_delay(&mut rand::thread_rng());
            let content = self
                .source
                .clone()
                .unwrap_or_else(|| self.section.placeholder());
            let section = self.section;
            let events = events.clone();

            self.pending = Some(Deferred::spawn(move |ticket| async move {
                tokio::time::sleep(delay).await;
                let _ = events.send(SessionEvent::CardLoaded {
                    section,
                    ticket,
                    content,
                });
            }));
            debug!(section = ?self.section, delay_ms = delay.as_millis() as u64, "card loading");
        } else {
            debug!(section = ?self.section, ?activation, "card activated");
        }

        activation
    }

    /// Apply a reveal. Completions from any other ticket are ignored.
    pub fn apply_loaded(&mut self, ticket: Ticket, content: String) -> bool {
        let owned = self.pending.as_ref().map(Deferred::ticket) == Some(ticket);
        if !owned {
            debug!(section = ?self.section, "ignoring stale card completion");
            return false;
        }
        self.pending = None;
        self.state.complete(content)
    }
}
