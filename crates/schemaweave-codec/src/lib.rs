//! Schemaweave Codec - JSON Schema composition for typed values
//!
//! This crate maps JSON values governed by the composition keywords of JSON
//! Schema onto statically-typed Rust values and back:
//! - **required / const**: checked before anything is routed
//! - **patternProperties**: keys routed into named buckets by regex
//! - **additionalProperties**: a catch-all bucket, or a batch-reported error
//! - **oneOf / anyOf / allOf**: tagged unions resolved by cardinality
//!
//! ## Features
//!
//! - **One generic codec**: a declarative [`FieldSpec`] drives a single
//!   decode/encode pair instead of per-type code
//! - **Strict parsing**: duplicate keys are rejected at any depth
//! - **Fragment merge**: encoding splices ordered fragments with conflict
//!   detection
//! - **Declarations**: specs and shapes load from JSON or YAML
//! - **Detailed errors**: union failures carry every per-variant reason
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaweave_codec::{FieldSpec, Shape, Encode};
//! use serde_json::json;
//!
//! let spec = FieldSpec::builder()
//!     .known(["id"])
//!     .required(["id"])
//!     .pattern("^x-", "extensions")
//!     .additional_any()
//!     .build()
//!     .unwrap();
//!
//! let decoded = Shape::Object(spec)
//!     .decode(br#"{"id":"a","x-foo":"bar","unk":"baz"}"#)
//!     .unwrap();
//!
//! let routed = decoded.as_routed().unwrap();
//! assert_eq!(routed.known.get("id"), Some(&json!("a")));
//! assert_eq!(routed.buckets.get("extensions").unwrap().len(), 1);
//! assert_eq!(routed.additional.get("unk"), Some(&json!("baz")));
//!
//! assert_eq!(decoded.to_value().unwrap(), json!({"id":"a","x-foo":"bar","unk":"baz"}));
//! ```
//!
//! ## Typed values
//!
//! - [`Document<K>`]: known fields in a serde struct, buckets kept raw
//! - [`Plain<T>`]: a scalar or array parsed directly
//! - [`UnionValue<U>`]: the matched members of a [`Union`] enum
//! - [`Composed<O, U>`]: an object part and a union over the same input
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod pattern;
pub mod raw;
pub mod shape;
pub mod spec;

pub use decode::{Buckets, Decode, Member, Plain, Routed, Union, UnionValue, Variant};
pub use document::{Composed, Document, ObjectSchema};
pub use encode::{merge, Encode, Merger};
pub use error::{
    DecodeError, DecodeResult, EncodeError, EncodeResult, SpecError, SpecResult, VariantFailure,
};
pub use raw::RawObject;
pub use shape::{Decoded, Shape};
pub use spec::{
    AdditionalProperties, Composition, CompositionKind, ConstPolicy, FieldSpec, FieldSpecBuilder,
    FieldSpecDecl, PatternRule, VariantSpec,
};

/// Decode raw JSON bytes into `T`
pub fn from_slice<T: Decode>(raw: &[u8]) -> DecodeResult<T> {
    T::decode(raw)
}

/// Encode `value` as compact JSON bytes
pub fn to_vec<T: Encode + ?Sized>(value: &T) -> EncodeResult<Vec<u8>> {
    value.encode()
}

/// Encode `value` as pretty-printed JSON text
pub fn to_string_pretty<T: Encode + ?Sized>(value: &T) -> EncodeResult<String> {
    Ok(serde_json::to_string_pretty(&value.to_value()?)?)
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
