//! Typed object documents
//!
//! A [`Document<K>`] is the typed counterpart of a routed object: the known
//! keys deserialize into the caller's struct `K`, pattern buckets and
//! additional properties stay as raw objects. `K` names its [`FieldSpec`]
//! through [`ObjectSchema`], so the spec is built once per type and shared:
//!
//! ```
//! use schemaweave_codec::{Decode, Document, Encode, FieldSpec, ObjectSchema};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use std::sync::OnceLock;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Book {
//!     id: String,
//! }
//!
//! impl ObjectSchema for Book {
//!     fn field_spec() -> &'static FieldSpec {
//!         static SPEC: OnceLock<FieldSpec> = OnceLock::new();
//!         SPEC.get_or_init(|| {
//!             FieldSpec::builder()
//!                 .known(["id"])
//!                 .required(["id"])
//!                 .constant("type", json!("book"))
//!                 .pattern("^x-", "extensions")
//!                 .build()
//!                 .expect("static book spec")
//!         })
//!     }
//! }
//!
//! let doc = Document::<Book>::decode(br#"{"id":"a","x-note":"n"}"#).unwrap();
//! assert_eq!(doc.known.id, "a");
//! assert_eq!(doc.bucket("extensions").unwrap().len(), 1);
//! assert_eq!(doc.encode().unwrap(), br#"{"type":"book","id":"a","x-note":"n"}"#);
//! ```
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::decode::route::{self, Buckets};
use crate::decode::union::{Union, UnionValue};
use crate::decode::Decode;
use crate::encode::Encode;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::raw::RawObject;
use crate::shape::{self, Decoded};
use crate::spec::FieldSpec;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// The known-fields struct of a composed object type
pub trait ObjectSchema: Serialize + DeserializeOwned {
    /// The spec routing this type's objects
    fn field_spec() -> &'static FieldSpec;
}

/// An object split into typed known fields, pattern buckets and additional
/// properties. `union` holds the matched variants when the spec carries a
/// composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<K> {
    pub known: K,
    pub buckets: Buckets,
    pub additional: RawObject,
    pub union: Option<UnionValue<Decoded>>,
}

impl<K: ObjectSchema> Document<K> {
    /// A document with empty buckets
    pub fn new(known: K) -> Self {
        Self {
            known,
            buckets: Buckets::for_spec(K::field_spec()),
            additional: RawObject::new(),
            union: None,
        }
    }

    /// Add an entry to bucket `name`
    pub fn with_bucket_entry(mut self, name: &str, key: impl Into<String>, value: Value) -> Self {
        self.buckets.entry(name).insert(key, value);
        self
    }

    /// Add an additional property
    pub fn with_additional(mut self, key: impl Into<String>, value: Value) -> Self {
        self.additional.insert(key, value);
        self
    }
}

impl<K> Document<K> {
    pub fn bucket(&self, name: &str) -> Option<&RawObject> {
        self.buckets.get(name)
    }

    /// Bucket `name` with every value deserialized into `V`; an undeclared
    /// bucket reads as empty
    pub fn bucket_as<V: DeserializeOwned>(&self, name: &str) -> DecodeResult<BTreeMap<String, V>> {
        match self.buckets.get(name) {
            Some(bucket) => bucket.typed(),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Additional properties with every value deserialized into `V`
    pub fn additional_as<V: DeserializeOwned>(&self) -> DecodeResult<BTreeMap<String, V>> {
        self.additional.typed()
    }
}

impl<K: ObjectSchema> Decode for Document<K> {
    fn decode_value(value: &Value) -> DecodeResult<Self> {
        let spec = K::field_spec();
        let object = route::object_input(value)?;
        let routed = route::route(&object, spec)?;
        let union = shape::decode_composition(value, spec)?;
        let known = serde_json::from_value(routed.known.into_value())
            .map_err(|source| DecodeError::Field { key: None, source })?;

        Ok(Self {
            known,
            buckets: routed.buckets,
            additional: routed.additional,
            union,
        })
    }
}

impl<K: ObjectSchema> Encode for Document<K> {
    /// Consts, known fields, buckets (declared ones first, in declaration
    /// order), additional properties, then union members
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        let spec = K::field_spec();
        let mut fragments = Vec::with_capacity(self.buckets.len() + 3);
        fragments.push(spec.const_fragment());
        fragments.push(serde_json::to_value(&self.known)?);
        fragments.extend(self.buckets.iter().map(|(_, bucket)| bucket.clone().into_value()));
        fragments.push(self.additional.clone().into_value());
        if let Some(union) = &self.union {
            fragments.extend(union.fragments()?);
        }
        Ok(fragments)
    }
}

/// An object part and a union decoded independently from the same input
#[derive(Debug, Clone, PartialEq)]
pub struct Composed<O, U> {
    pub object: O,
    pub union: UnionValue<U>,
}

impl<O: Decode, U: Union> Decode for Composed<O, U> {
    fn decode_value(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            object: O::decode_value(value)?,
            union: UnionValue::<U>::decode_value(value)?,
        })
    }
}

impl<O: Encode, U: Encode> Encode for Composed<O, U> {
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        let mut fragments = self.object.fragments()?;
        fragments.extend(self.union.fragments()?);
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    }

    impl ObjectSchema for Tag {
        fn field_spec() -> &'static FieldSpec {
            static SPEC: OnceLock<FieldSpec> = OnceLock::new();
            SPEC.get_or_init(|| {
                FieldSpec::builder()
                    .known(["name", "color"])
                    .required(["name"])
                    .pattern("^x-", "extensions")
                    .additional_any()
                    .build()
                    .expect("tag spec")
            })
        }
    }

    #[test]
    fn test_known_fields_typed() {
        let doc = Document::<Tag>::decode(br#"{"name":"rust","other":1}"#).unwrap();
        assert_eq!(doc.known, Tag { name: "rust".to_string(), color: None });
        assert_eq!(doc.additional_as::<i64>().unwrap()["other"], 1);
    }

    #[test]
    fn test_known_field_type_error() {
        let error = Document::<Tag>::decode(br#"{"name":5}"#).unwrap_err();
        assert!(matches!(error, DecodeError::Field { key: None, .. }));
    }

    #[test]
    fn test_required_checked_before_typing() {
        let error = Document::<Tag>::decode(br#"{"color":"red"}"#).unwrap_err();
        assert!(matches!(error, DecodeError::RequiredKeyMissing { ref key } if key == "name"));
    }

    #[test]
    fn test_new_document_encodes() {
        let doc = Document::new(Tag { name: "a".to_string(), color: None })
            .with_bucket_entry("extensions", "x-rank", json!(3))
            .with_additional("note", json!("n"));
        assert_eq!(doc.to_value().unwrap(), json!({"name": "a", "x-rank": 3, "note": "n"}));
        assert_eq!(Document::<Tag>::decode(&doc.encode().unwrap()).unwrap(), doc);
    }

    #[test]
    fn test_bucket_as() {
        let doc = Document::<Tag>::decode(br#"{"name":"a","x-a":"1","x-b":"2"}"#).unwrap();
        let extensions = doc.bucket_as::<String>("extensions").unwrap();
        assert_eq!(extensions.len(), 2);
        assert_eq!(extensions["x-b"], "2");
        assert!(doc.bucket_as::<String>("missing").unwrap().is_empty());
        assert!(doc.bucket_as::<u8>("extensions").is_err());
    }
}
