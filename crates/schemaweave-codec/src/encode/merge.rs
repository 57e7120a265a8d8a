//! Left-to-right fragment merging
//!
//! Every encoded value is assembled from an ordered list of JSON fragments.
//! Fragments that serialize to `{}` or `null` contribute nothing. Object
//! fragments are spliced together with the later fragment winning on a
//! repeated key. A scalar or array fragment may only become the whole result
//! when nothing has been emitted yet, or when it equals the scalar already
//! there; any other mix of scalars and objects is a merge conflict.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::error::{EncodeError, EncodeResult};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
enum Accumulated {
    #[default]
    Empty,
    Object(Map<String, Value>),
    Scalar(Value),
}

impl Accumulated {
    fn render(&self) -> String {
        match self {
            Self::Empty => "{}".to_string(),
            Self::Object(map) => Value::Object(map.clone()).to_string(),
            Self::Scalar(value) => value.to_string(),
        }
    }
}

/// Accumulates fragments into one JSON value
#[derive(Debug, Clone, Default)]
pub struct Merger {
    acc: Accumulated,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fragment is skipped entirely
    pub fn is_trivial(fragment: &Value) -> bool {
        match fragment {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Merge the next fragment
    pub fn push(&mut self, fragment: Value) -> EncodeResult<()> {
        if Self::is_trivial(&fragment) {
            return Ok(());
        }

        let acc = std::mem::take(&mut self.acc);
        self.acc = match (acc, fragment) {
            (Accumulated::Empty, Value::Object(map)) => Accumulated::Object(map),
            (Accumulated::Empty, scalar) => Accumulated::Scalar(scalar),
            (Accumulated::Object(mut acc), Value::Object(map)) => {
                for (key, value) in map {
                    acc.insert(key, value);
                }
                Accumulated::Object(acc)
            }
            (Accumulated::Scalar(acc), scalar) if !scalar.is_object() && acc == scalar => {
                Accumulated::Scalar(acc)
            }
            (acc, fragment) => {
                let error = EncodeError::UnionMergeConflict {
                    accumulated: acc.render(),
                    fragment: fragment.to_string(),
                };
                self.acc = acc;
                return Err(error);
            }
        };
        Ok(())
    }

    /// The merged value; `{}` when nothing was emitted
    pub fn finish(self) -> Value {
        match self.acc {
            Accumulated::Empty => Value::Object(Map::new()),
            Accumulated::Object(map) => Value::Object(map),
            Accumulated::Scalar(value) => value,
        }
    }
}

/// Merge fragments in order
pub fn merge<I>(fragments: I) -> EncodeResult<Value>
where
    I: IntoIterator<Item = Value>,
{
    let mut merger = Merger::new();
    for fragment in fragments {
        merger.push(fragment)?;
    }
    Ok(merger.finish())
}

/// Merge fragments in order and render the result as JSON bytes
pub fn merge_to_vec<I>(fragments: I) -> EncodeResult<Vec<u8>>
where
    I: IntoIterator<Item = Value>,
{
    Ok(serde_json::to_vec(&merge(fragments)?)?)
}
