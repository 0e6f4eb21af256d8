//! Command implementations for the protogen CLI

pub mod generate;

pub use generate::run_generate;
