//! Screen navigation and the single-writer event loop.
//!
//! Deferred tasks only send `SessionEvent`s; `Session::handle` is the one
//! place those events are applied, one at a time, to whichever screen is
//! current. Replacing a screen drops it, which cancels its pending tasks.

use std::sync::Arc;

use tracing::{debug, info};

use crate::card::Activation;
use crate::config::ProtogenConfig;
use crate::event::{self, EventReceiver, EventSender, SessionEvent};
use crate::form::{SetupForm, SubmitOutcome};
use crate::generation::{ProtocolGenerator, Section};
use crate::workspace::Workspace;

#[derive(Debug)]
pub enum Screen {
    Setup(SetupForm),
    Workspace(Workspace),
}

/// What `Session::handle` did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Setup → Workspace
    Navigated,
    /// A card finished loading
    CardLoaded(Section),
    /// The event belonged to a screen or task that no longer exists
    Stale,
}

pub struct Session {
    config: ProtogenConfig,
    generator: Arc<dyn ProtocolGenerator>,
    screen: Screen,
    events_tx: EventSender,
    events_rx: EventReceiver,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: ProtogenConfig, generator: Arc<dyn ProtocolGenerator>) -> Self {
        let (events_tx, events_rx) = event::channel();
        Self {
            config,
            generator,
            screen: Screen::Setup(SetupForm::default()),
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &ProtogenConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn setup(&self) -> Option<&SetupForm> {
        match &self.screen {
            Screen::Setup(form) => Some(form),
            Screen::Workspace(_) => None,
        }
    }

    pub fn setup_mut(&mut self) -> Option<&mut SetupForm> {
        match &mut self.screen {
            Screen::Setup(form) => Some(form),
            Screen::Workspace(_) => None,
        }
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        match &self.screen {
            Screen::Workspace(workspace) => Some(workspace),
            Screen::Setup(_) => None,
        }
    }

    /// Submit the setup form. Outside the setup screen this is a rejection.
    pub fn submit(&mut self) -> SubmitOutcome {
        match &mut self.screen {
            Screen::Setup(form) => {
                form.submit(&self.generator, &self.config.timings, &self.events_tx)
            }
            Screen::Workspace(_) => SubmitOutcome::Rejected,
        }
    }

    /// Activate a workspace card; `None` when not on the workspace
    pub fn activate(&mut self, section: Section) -> Option<Activation> {
        match &mut self.screen {
            Screen::Workspace(workspace) => {
                Some(workspace.activate(section, &self.config.timings, &self.events_tx))
            }
            Screen::Setup(_) => None,
        }
    }

    /// Return to a fresh setup form, discarding the workspace
    pub fn back_to_setup(&mut self) {
        info!("navigating back to setup");
        self.screen = Screen::Setup(SetupForm::default());
    }

    /// Apply one deferred completion
    pub fn handle(&mut self, event: SessionEvent) -> Handled {
        match event {
            SessionEvent::SubmissionReady {
                ticket,
                inputs,
                generated,
            } => {
                let owned = matches!(&self.screen, Screen::Setup(form) if form.owns(ticket));
                if !owned {
                    debug!("dropping stale submission");
                    return Handled::Stale;
                }
                let workspace = Workspace::new(inputs, generated);
                info!(title = %workspace.title(), "navigating to workspace");
                self.screen = Screen::Workspace(workspace);
                Handled::Navigated
            }
            SessionEvent::CardLoaded {
                section,
                ticket,
                content,
            } => {
                let Screen::Workspace(workspace) = &mut self.screen else {
                    debug!(?section, "dropping card completion outside workspace");
                    return Handled::Stale;
                };
                if workspace.apply_card_loaded(section, ticket, content) {
                    Handled::CardLoaded(section)
                } else {
                    Handled::Stale
                }
            }
        }
    }

    /// Wait for the next deferred completion
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Next deferred completion if one is already queued
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Apply every queued completion; returns how many changed state
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_next_event() {
            if self.handle(event) != Handled::Stale {
                applied += 1;
            }
        }
        applied
    }
}
