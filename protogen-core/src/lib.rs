pub mod card;
pub mod config;
pub mod deferred;
pub mod error;
pub mod event;
pub mod form;
pub mod generation;
pub mod report;
pub mod session;
pub mod similar;
pub mod workspace;

pub use card::{Activation, CardState, ContentCard, Phase};
pub use config::{ProtogenConfig, Theme, TimingsConfig};
pub use error::{ProtogenError, Result};
pub use event::SessionEvent;
pub use form::{FormField, FormInputs, FormPhase, SetupForm, SubmitOutcome};
pub use generation::{GeneratedProtocol, MockGenerator, ProtocolGenerator, Section};
pub use report::{ProtocolReport, REPORT_FILENAME, REPORT_MIME};
pub use session::{Handled, Screen, Session};
pub use similar::SimilarProtocolEntry;
pub use workspace::Workspace;
