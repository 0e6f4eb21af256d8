//! Terminal front-end for the protocol generator
//!
//! Two screens driven by one `Session`:
//! - Setup: four-field form, submit gated on completeness
//! - Workspace: similar protocols, generated title, three section cards
//!
//! Deferred completions arrive over the session channel and are applied
//! between frames, so all state changes happen on the draw loop.

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;
