//! Structured error types for protogen-core.
//!
//! Library callers get composable `thiserror` variants; the `protogen`
//! binary wraps them in `anyhow` at the command boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormField;

/// Main error type for protogen-core operations
#[derive(Error, Debug)]
pub enum ProtogenError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file is not valid TOML for `ProtogenConfig`
    #[error("Invalid config file {path:?}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be written back as TOML
    #[error("Failed to serialize config: {source}")]
    TomlSerialize { source: toml::ser::Error },

    /// Configuration values are inconsistent
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// One or more required form fields are empty
    #[error("Missing required field(s): {}", format_fields(.missing))]
    IncompleteForm { missing: Vec<FormField> },

    /// The generation collaborator could not produce a protocol
    #[error("Generation failed: {reason}")]
    GenerationFailed { reason: String },

    /// The generation collaborator did not answer in time
    #[error("Generation timed out after {after_ms}ms")]
    GenerationTimeout { after_ms: u64 },
}

/// Result type alias for protogen-core operations
pub type Result<T> = std::result::Result<T, ProtogenError>;

fn format_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ProtogenError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a TOML parse error for the given file
    pub fn toml_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::TomlParse {
            path: path.into(),
            source,
        }
    }

    /// Create a generation failure
    pub fn generation_failed(reason: impl Into<String>) -> Self {
        Self::GenerationFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_form_lists_labels() {
        let err = ProtogenError::IncompleteForm {
            missing: vec![FormField::Title, FormField::StudyType],
        };
        assert_eq!(
            err.to_string(),
            "Missing required field(s): Study Title, Study Type"
        );
    }

    #[test]
    fn test_generation_timeout_message() {
        let err = ProtogenError::GenerationTimeout { after_ms: 10 };
        assert_eq!(err.to_string(), "Generation timed out after 10ms");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ProtogenError = io_err.into();

        assert!(matches!(err, ProtogenError::Io { .. }));
    }
}
