//! Encoding composed values back to JSON
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

pub mod merge;

pub use merge::{merge, merge_to_vec, Merger};

use crate::error::EncodeResult;
use serde_json::Value;

/// A value that renders as an ordered list of JSON fragments
pub trait Encode {
    /// Fragments in merge order
    fn fragments(&self) -> EncodeResult<Vec<Value>>;

    /// Merge the fragments into one JSON value
    fn to_value(&self) -> EncodeResult<Value> {
        merge(self.fragments()?)
    }

    /// Merge the fragments and render compact JSON bytes
    fn encode(&self) -> EncodeResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.to_value()?)?)
    }
}
