//! Events delivered by deferred tasks back to the session loop

use tokio::sync::mpsc;

use crate::deferred::Ticket;
use crate::error::Result;
use crate::form::FormInputs;
use crate::generation::{GeneratedProtocol, Section};

#[derive(Debug)]
pub enum SessionEvent {
    /// A content card's reveal delay elapsed
    CardLoaded {
        section: Section,
        ticket: Ticket,
        content: String,
    },
    /// The setup form's submit delay elapsed and generation finished
    SubmissionReady {
        ticket: Ticket,
        inputs: FormInputs,
        generated: Result<GeneratedProtocol>,
    },
}

pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
