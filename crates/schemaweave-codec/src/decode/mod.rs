//! Decoding JSON into composed values
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

pub mod route;
pub mod union;

pub use route::{route, Buckets, Routed};
pub use union::{resolve, Member, Union, UnionValue, Variant};

use crate::encode::Encode;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::raw;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A value that can be decoded from JSON
pub trait Decode: Sized {
    /// Decode from an already-parsed value
    fn decode_value(value: &Value) -> DecodeResult<Self>;

    /// Parse strictly, then decode
    fn decode(raw: &[u8]) -> DecodeResult<Self> {
        Self::decode_value(&raw::parse(raw)?)
    }
}

/// A value parsed directly into `T` with no routing, for scalar and array
/// alternatives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plain<T>(pub T);

impl<T> Plain<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> Decode for Plain<T> {
    fn decode_value(value: &Value) -> DecodeResult<Self> {
        T::deserialize(value)
            .map(Plain)
            .map_err(|source| DecodeError::Typed { source })
    }
}

impl<T: Serialize> Encode for Plain<T> {
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        Ok(vec![serde_json::to_value(&self.0)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_scalar() {
        let text = Plain::<String>::decode(b"\"hi\"").unwrap();
        assert_eq!(text, Plain("hi".to_string()));
        assert_eq!(text.encode().unwrap(), b"\"hi\"");
    }

    #[test]
    fn test_plain_array() {
        let items = Plain::<Vec<u32>>::decode(b"[1,2,3]").unwrap();
        assert_eq!(items.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_plain_type_error() {
        assert!(matches!(Plain::<bool>::decode(b"{}"), Err(DecodeError::Typed { .. })));
    }

    #[test]
    fn test_plain_parse_error() {
        assert!(matches!(Plain::<bool>::decode(b"tru"), Err(DecodeError::Parse { .. })));
    }
}
