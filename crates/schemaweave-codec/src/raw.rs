//! Ordered raw JSON objects and strict parsing
//!
//! A [`RawObject`] keeps every key of an input object in document order,
//! with the value left as an untyped [`serde_json::Value`]. Routing moves
//! entries from one RawObject into others without ever re-typing them.
//!
//! [`parse`] is the single entry point from bytes. Unlike a plain
//! `serde_json::from_slice`, it rejects objects that repeat a key instead of
//! silently keeping the last occurrence.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::error::{DecodeError, DecodeResult};
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::cell::RefCell;
use std::fmt;

/// Ordered key to raw value mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObject(Map<String, Value>);

impl RawObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, returning the previous one. An existing key keeps its
    /// position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Convert into a JSON object value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserialize every entry into `V`, keyed by the original key
    pub fn typed<V>(&self) -> DecodeResult<std::collections::BTreeMap<String, V>>
    where
        V: serde::de::DeserializeOwned,
    {
        self.0
            .iter()
            .map(|(key, value)| {
                V::deserialize(value)
                    .map(|typed| (key.clone(), typed))
                    .map_err(|e| DecodeError::field(key.as_str(), e))
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RawObject {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RawObject {
    type Error = DecodeError;

    fn try_from(value: Value) -> DecodeResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DecodeError::TypeMismatch {
                expected: "object",
                found: DecodeError::kind_of(&other),
            }),
        }
    }
}

impl FromIterator<(String, Value)> for RawObject {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for RawObject {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Parse JSON text, rejecting duplicate object keys at any depth
pub fn parse(raw: &[u8]) -> DecodeResult<Value> {
    let duplicate = RefCell::new(None);
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    let parsed = StrictSeed {
        duplicate: &duplicate,
    }
    .deserialize(&mut deserializer)
    .and_then(|value| deserializer.end().map(|()| value));

    match parsed {
        Ok(value) => Ok(value),
        Err(source) => match duplicate.into_inner() {
            Some(key) => Err(DecodeError::DuplicateKey { key }),
            None => Err(DecodeError::parse(source)),
        },
    }
}

/// Parse JSON text that must be an object
pub fn parse_object(raw: &[u8]) -> DecodeResult<RawObject> {
    RawObject::try_from(parse(raw)?)
}

/// Seed threading the duplicate-key slot through nested values
#[derive(Clone, Copy)]
struct StrictSeed<'a> {
    duplicate: &'a RefCell<Option<String>>,
}

impl<'de> DeserializeSeed<'de> for StrictSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for StrictSeed<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some(key) = access.next_key::<String>()? {
            if map.contains_key(&key) {
                let message = format!("duplicate key `{}`", key);
                *self.duplicate.borrow_mut() = Some(key);
                return Err(de::Error::custom(message));
            }
            let value = access.next_value_seed(self)?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}
