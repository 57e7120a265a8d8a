//! Error types for decoding, encoding and spec construction
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encode operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for building a [`crate::FieldSpec`] or [`crate::Shape`]
pub type SpecResult<T> = Result<T, SpecError>;

/// One failed alternative inside a `oneOf`/`anyOf`/`allOf` composition
#[derive(Debug)]
pub struct VariantFailure {
    /// Name of the variant that was attempted
    pub variant: String,
    /// Why the variant did not decode
    pub error: Box<DecodeError>,
}

impl VariantFailure {
    pub fn new(variant: impl Into<String>, error: DecodeError) -> Self {
        Self {
            variant: variant.into(),
            error: Box::new(error),
        }
    }
}

impl fmt::Display for VariantFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.variant, self.error)
    }
}

/// Formats a list of variant failures as `[a: reason; b: reason]`
struct Attempts<'a>(&'a [VariantFailure]);

impl fmt::Display for Attempts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        write!(f, "]")
    }
}

fn list_attempts(failures: &[VariantFailure]) -> Attempts<'_> {
    Attempts(failures)
}

/// Errors produced while decoding JSON into a composed value
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input is not well-formed JSON
    #[error("invalid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// An object in the input repeats a key
    #[error("duplicate key '{key}' in object")]
    DuplicateKey { key: String },

    /// Input has the wrong JSON type for the target shape
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A required key is absent
    #[error("required key '{key}' is missing")]
    RequiredKeyMissing { key: String },

    /// A const-constrained key holds a different value, or is absent under
    /// [`crate::ConstPolicy::Strict`]
    #[error("bad or missing const '{key}': expected {expected}, found {}", .actual.as_deref().unwrap_or("nothing"))]
    ConstMismatch {
        key: String,
        expected: String,
        actual: Option<String>,
    },

    /// Keys matched by no known key or pattern rule, with no additional
    /// properties bucket declared
    #[error("additional properties not allowed: {}", .keys.join(", "))]
    AdditionalPropertiesNotAllowed { keys: Vec<String> },

    /// A `oneOf` matched zero or several variants
    #[error("oneOf expects exactly one matching variant, {matched} matched ({}); failures: {}", .matched_variants.join(", "), list_attempts(.attempts))]
    OneOfCardinality {
        matched: usize,
        matched_variants: Vec<String>,
        attempts: Vec<VariantFailure>,
    },

    /// An `anyOf` matched no variant
    #[error("anyOf matched no variant: {}", list_attempts(.attempts))]
    AnyOfNoMatch { attempts: Vec<VariantFailure> },

    /// At least one `allOf` variant failed
    #[error("allOf requires every variant, {} failed: {}", .attempts.len(), list_attempts(.attempts))]
    AllOfFailed { attempts: Vec<VariantFailure> },

    /// A claimed value could not be deserialized into its typed slot
    #[error("{}: {source}", .key.as_deref().map(|k| format!("field '{}'", k)).unwrap_or_else(|| "known fields".to_string()))]
    Field {
        key: Option<String>,
        #[source]
        source: serde_json::Error,
    },

    /// A value parsed directly into a non-object type failed to deserialize
    #[error("typed value: {source}")]
    Typed {
        #[source]
        source: serde_json::Error,
    },

    /// A bucket entry or array item does not match its declared shape
    #[error("invalid value at '{key}': {source}")]
    InvalidEntry {
        key: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Wrap a serde_json parse failure
    pub fn parse(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }

    /// Wrap a typed deserialization failure for a single key
    pub fn field(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Field {
            key: Some(key.into()),
            source,
        }
    }

    /// Attach the key or index an entry error occurred at
    pub fn at(key: impl Into<String>, source: DecodeError) -> Self {
        Self::InvalidEntry {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Name of the JSON type of `value`, as used in [`DecodeError::TypeMismatch`]
    pub fn kind_of(value: &serde_json::Value) -> &'static str {
        use serde_json::Value;
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Errors produced while merging fragments back into one JSON value
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Two fragments cannot share one output value, e.g. a scalar and an
    /// object, or two different scalars
    #[error("cannot merge fragment {fragment} into {accumulated}")]
    UnionMergeConflict {
        accumulated: String,
        fragment: String,
    },

    /// A typed slot failed to serialize
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors produced while building or declaring a spec
#[derive(Debug, Error)]
pub enum SpecError {
    /// A pattern rule does not compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A raw const literal is not valid JSON
    #[error("invalid const literal for '{key}': {source}")]
    InvalidConst {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required key is neither known nor const
    #[error("required key '{key}' is not a known or const key")]
    UnknownRequiredKey { key: String },

    /// A composition declares no variants
    #[error("{kind} composition declares no variants")]
    EmptyComposition { kind: &'static str },

    /// A JSON or YAML declaration failed to parse
    #[error("invalid declaration: {0}")]
    Declaration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_mismatch_display() {
        let error = DecodeError::ConstMismatch {
            key: "type".to_string(),
            expected: "\"book\"".to_string(),
            actual: None,
        };
        assert_eq!(
            error.to_string(),
            "bad or missing const 'type': expected \"book\", found nothing"
        );
    }

    #[test]
    fn test_union_display_lists_every_attempt() {
        let error = DecodeError::AnyOfNoMatch {
            attempts: vec![
                VariantFailure::new(
                    "a",
                    DecodeError::RequiredKeyMissing {
                        key: "id".to_string(),
                    },
                ),
                VariantFailure::new(
                    "b",
                    DecodeError::TypeMismatch {
                        expected: "string",
                        found: "object",
                    },
                ),
            ],
        };
        let text = error.to_string();
        assert!(text.contains("a: required key 'id' is missing"));
        assert!(text.contains("b: expected string, found object"));
    }

    #[test]
    fn test_additional_properties_display() {
        let error = DecodeError::AdditionalPropertiesNotAllowed {
            keys: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(error.to_string(), "additional properties not allowed: x, y");
    }
}
