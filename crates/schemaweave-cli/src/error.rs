//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use schemaweave_codec::{DecodeError, EncodeError, SpecError, VariantFailure};
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Input did not decode against the shape
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Decoded value could not be merged back into JSON
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// Shape declaration is invalid
    #[error("Invalid shape: {0}")]
    Spec(#[from] SpecError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} format", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// No shape given on the command line or in configuration
    #[error("No shape file given. Pass --shape or set codec.default_shape in the configuration")]
    MissingShape,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error caused by `source`
    pub fn config_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Decode(_) => 2,
            Self::Encode(_) => 3,
            Self::Spec(_) => 4,
            Self::FileNotFound { .. } => 5,
            Self::InvalidFormat { .. } => 6,
            Self::MissingShape => 7,
            Self::Config { .. } => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::MissingShape)
    }

    /// Per-variant failures of a union decode, if this is one
    pub fn variant_failures(&self) -> &[VariantFailure] {
        match self {
            Self::Decode(
                DecodeError::OneOfCardinality { attempts, .. }
                | DecodeError::AnyOfNoMatch { attempts }
                | DecodeError::AllOfFailed { attempts },
            ) => attempts.as_slice(),
            _ => &[],
        }
    }
}

/// Format an error for display to the user
///
/// Union failures get one indented line per attempted variant.
pub fn format_error(error: &Error, use_color: bool) -> String {
    use colored::Colorize;

    let headline = match error {
        Error::Decode(DecodeError::OneOfCardinality { matched, matched_variants, .. }) => {
            if matched_variants.is_empty() {
                format!("Decode failed: oneOf expects exactly one matching variant, {} matched", matched)
            } else {
                format!(
                    "Decode failed: oneOf expects exactly one matching variant, {} matched ({})",
                    matched,
                    matched_variants.join(", ")
                )
            }
        }
        Error::Decode(DecodeError::AnyOfNoMatch { .. }) => "Decode failed: anyOf matched no variant".to_string(),
        Error::Decode(DecodeError::AllOfFailed { attempts }) => {
            format!("Decode failed: allOf requires every variant, {} failed", attempts.len())
        }
        Error::Config {
            message,
            source: Some(source),
        } => format!("Configuration error: {}: {:#}", message, source),
        other => other.to_string(),
    };

    let mut output = if use_color {
        format!("{} {}", "Error:".red().bold(), headline)
    } else {
        format!("Error: {}", headline)
    };

    for failure in error.variant_failures() {
        let variant = if use_color {
            failure.variant.bold().to_string()
        } else {
            failure.variant.clone()
        };
        output.push_str(&format!("\n  • {}: {}", variant, failure.error));
    }

    output
}
