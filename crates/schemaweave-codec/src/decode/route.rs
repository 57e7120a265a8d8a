//! Routing object keys into known fields, pattern buckets and additional
//! properties
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::encode::Encode;
use crate::error::{DecodeError, DecodeResult, EncodeResult};
use crate::raw::RawObject;
use crate::shape::Shape;
use crate::spec::{AdditionalProperties, ConstPolicy, FieldSpec};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Named pattern buckets in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets(Vec<(String, RawObject)>);

impl Buckets {
    /// One empty bucket per name declared in `spec`
    pub fn for_spec(spec: &FieldSpec) -> Self {
        Self(
            spec.bucket_names()
                .into_iter()
                .map(|name| (name.to_string(), RawObject::new()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&RawObject> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, bucket)| bucket)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RawObject> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, bucket)| bucket)
    }

    /// Bucket `name`, created at the end if it does not exist yet
    pub fn entry(&mut self, name: &str) -> &mut RawObject {
        let index = match self.0.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.0.push((name.to_string(), RawObject::new()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawObject)> {
        self.0.iter().map(|(name, bucket)| (name.as_str(), bucket))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of entries across all buckets
    pub fn entry_count(&self) -> usize {
        self.0.iter().map(|(_, bucket)| bucket.len()).sum()
    }
}

impl Serialize for Buckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, bucket) in &self.0 {
            map.serialize_entry(name, bucket)?;
        }
        map.end()
    }
}

/// An object split according to a [`FieldSpec`]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Routed {
    /// Known keys present in the input
    pub known: RawObject,
    /// The spec's const literals, rendered whether or not the input had them
    pub constants: RawObject,
    /// Pattern buckets, one per declared bucket name
    pub buckets: Buckets,
    /// Keys matched by nothing, when the spec collects them
    pub additional: RawObject,
}

impl Encode for Routed {
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        let mut fragments = Vec::with_capacity(self.buckets.len() + 3);
        fragments.push(self.constants.clone().into_value());
        fragments.push(self.known.clone().into_value());
        fragments.extend(self.buckets.iter().map(|(_, bucket)| bucket.clone().into_value()));
        fragments.push(self.additional.clone().into_value());
        Ok(fragments)
    }
}

/// The object an object-shaped target routes. `null` reads as an empty
/// object; other non-objects are a type mismatch.
pub fn object_input(value: &Value) -> DecodeResult<RawObject> {
    match value {
        Value::Object(map) => Ok(RawObject::from(map.clone())),
        Value::Null => {
            tracing::debug!("null input read as empty object");
            Ok(RawObject::new())
        }
        other => Err(DecodeError::TypeMismatch {
            expected: "object",
            found: DecodeError::kind_of(other),
        }),
    }
}

/// Check required keys and consts, then route every key of `object`
pub fn route(object: &RawObject, spec: &FieldSpec) -> DecodeResult<Routed> {
    check_required(object, spec)?;
    check_constants(object, spec)?;

    let mut routed = Routed {
        known: RawObject::new(),
        constants: spec.constants().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        buckets: Buckets::for_spec(spec),
        additional: RawObject::new(),
    };
    let mut rejected = Vec::new();

    for (key, value) in object.iter() {
        let known = spec.is_known(key);
        if known {
            routed.known.insert(key.clone(), value.clone());
        }
        if known || spec.is_const(key) {
            continue;
        }

        let mut matched = false;
        for rule in spec.pattern_rules() {
            if rule.is_match(key) {
                tracing::trace!(key = %key, bucket = rule.bucket(), "routed key to pattern bucket");
                routed.buckets.entry(rule.bucket()).insert(key.clone(), value.clone());
                matched = true;
            }
        }
        if matched {
            continue;
        }

        match spec.additional() {
            AdditionalProperties::Bucket(_) => {
                routed.additional.insert(key.clone(), value.clone());
            }
            AdditionalProperties::Forbidden => rejected.push(key.clone()),
        }
    }

    if !rejected.is_empty() {
        return Err(DecodeError::AdditionalPropertiesNotAllowed { keys: rejected });
    }

    check_bucket_values(&routed, spec)?;

    tracing::debug!(
        known = routed.known.len(),
        bucketed = routed.buckets.entry_count(),
        additional = routed.additional.len(),
        "routed object"
    );
    Ok(routed)
}

fn check_required(object: &RawObject, spec: &FieldSpec) -> DecodeResult<()> {
    match spec.required_keys().iter().find(|key| !object.contains_key(key)) {
        Some(key) => Err(DecodeError::RequiredKeyMissing { key: key.clone() }),
        None => Ok(()),
    }
}

fn check_constants(object: &RawObject, spec: &FieldSpec) -> DecodeResult<()> {
    for (key, expected) in spec.constants() {
        match object.get(key) {
            Some(actual) if actual == expected => {}
            Some(actual) => {
                return Err(DecodeError::ConstMismatch {
                    key: key.clone(),
                    expected: expected.to_string(),
                    actual: Some(actual.to_string()),
                })
            }
            None if spec.const_policy() == ConstPolicy::Strict => {
                return Err(DecodeError::ConstMismatch {
                    key: key.clone(),
                    expected: expected.to_string(),
                    actual: None,
                })
            }
            None => {}
        }
    }
    Ok(())
}

fn check_bucket_values(routed: &Routed, spec: &FieldSpec) -> DecodeResult<()> {
    for rule in spec.pattern_rules() {
        if matches!(rule.shape(), Shape::Any) {
            continue;
        }
        let Some(bucket) = routed.buckets.get(rule.bucket()) else {
            continue;
        };
        for (key, value) in bucket.iter().filter(|(key, _)| rule.is_match(key)) {
            rule.shape()
                .decode_value(value)
                .map_err(|e| DecodeError::at(key.as_str(), e))?;
        }
    }

    if let AdditionalProperties::Bucket(shape) = spec.additional() {
        if !matches!(**shape, Shape::Any) {
            for (key, value) in routed.additional.iter() {
                shape
                    .decode_value(value)
                    .map_err(|e| DecodeError::at(key.as_str(), e))?;
            }
        }
    }
    Ok(())
}
