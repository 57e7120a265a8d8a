//! Union resolution for `oneOf`, `anyOf` and `allOf`
//!
//! Every variant is attempted independently against the same input. The
//! composition keyword then decides how many successes are acceptable:
//! exactly one for `oneOf`, at least one for `anyOf`, all of them for
//! `allOf`. Failures always carry every per-variant reason.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use super::Decode;
use crate::encode::Encode;
use crate::error::{DecodeError, DecodeResult, EncodeResult, VariantFailure};
use crate::spec::CompositionKind;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One variant that decoded successfully
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member<U> {
    pub variant: String,
    pub value: U,
}

/// The matched variants of a composition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionValue<U> {
    kind: CompositionKind,
    members: Vec<Member<U>>,
}

impl<U> UnionValue<U> {
    pub fn new(kind: CompositionKind, members: Vec<Member<U>>) -> Self {
        Self { kind, members }
    }

    /// A `oneOf` holding `value` as variant `variant`
    pub fn one_of(variant: impl Into<String>, value: U) -> Self {
        Self::new(
            CompositionKind::OneOf,
            vec![Member {
                variant: variant.into(),
                value,
            }],
        )
    }

    pub fn kind(&self) -> CompositionKind {
        self.kind
    }

    pub fn members(&self) -> &[Member<U>] {
        &self.members
    }

    /// Names of the matched variants, in declaration order
    pub fn matched(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.variant.as_str()).collect()
    }

    /// Value of variant `name`, if it matched
    pub fn get(&self, name: &str) -> Option<&U> {
        self.members.iter().find(|m| m.variant == name).map(|m| &m.value)
    }

    /// The single member of a one-member union
    pub fn into_one(self) -> Option<U> {
        let mut members = self.members;
        match members.len() {
            1 => members.pop().map(|m| m.value),
            _ => None,
        }
    }

    pub fn into_values(self) -> Vec<U> {
        self.members.into_iter().map(|m| m.value).collect()
    }
}

impl<U: Encode> Encode for UnionValue<U> {
    /// One fragment per member, each already merged on its own
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        self.members.iter().map(|m| m.value.to_value()).collect()
    }
}

/// Apply the cardinality rule of `kind` to a set of variant attempts
pub fn resolve<U, I>(kind: CompositionKind, attempts: I) -> DecodeResult<UnionValue<U>>
where
    I: IntoIterator<Item = (String, DecodeResult<U>)>,
{
    let mut members = Vec::new();
    let mut failures = Vec::new();
    for (variant, outcome) in attempts {
        match outcome {
            Ok(value) => members.push(Member { variant, value }),
            Err(error) => failures.push(VariantFailure::new(variant, error)),
        }
    }

    tracing::debug!(
        kind = %kind,
        matched = members.len(),
        failed = failures.len(),
        "resolved composition"
    );

    match kind {
        CompositionKind::OneOf if members.len() == 1 => Ok(UnionValue::new(kind, members)),
        CompositionKind::OneOf => Err(DecodeError::OneOfCardinality {
            matched: members.len(),
            matched_variants: members.into_iter().map(|m| m.variant).collect(),
            attempts: failures,
        }),
        CompositionKind::AnyOf if !members.is_empty() => Ok(UnionValue::new(kind, members)),
        CompositionKind::AnyOf => Err(DecodeError::AnyOfNoMatch { attempts: failures }),
        CompositionKind::AllOf if failures.is_empty() => Ok(UnionValue::new(kind, members)),
        CompositionKind::AllOf => Err(DecodeError::AllOfFailed { attempts: failures }),
    }
}

type VariantDecoder<U> = Box<dyn Fn(&Value) -> DecodeResult<U> + Send + Sync>;

/// A named alternative of a typed union `U`
pub struct Variant<U> {
    name: &'static str,
    decode: VariantDecoder<U>,
}

impl<U> Variant<U> {
    pub fn new<F>(name: &'static str, decode: F) -> Self
    where
        F: Fn(&Value) -> DecodeResult<U> + Send + Sync + 'static,
    {
        Self {
            name,
            decode: Box::new(decode),
        }
    }

    /// Variant decoding `T` and wrapping it with `wrap`, usually an enum
    /// constructor
    pub fn of<T>(name: &'static str, wrap: fn(T) -> U) -> Self
    where
        T: Decode + 'static,
        U: 'static,
    {
        Self::new(name, move |value| T::decode_value(value).map(wrap))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn attempt(&self, value: &Value) -> DecodeResult<U> {
        (self.decode)(value)
    }
}

impl<U> fmt::Debug for Variant<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A tagged sum type whose cases are the alternatives of one composition
///
/// ```
/// use schemaweave_codec::{CompositionKind, Decode, Encode, EncodeResult, Plain, Union, UnionValue, Variant};
/// use serde_json::Value;
///
/// #[derive(Debug, PartialEq)]
/// enum Limit {
///     Count(Plain<u64>),
///     Label(Plain<String>),
/// }
///
/// impl Union for Limit {
///     const KIND: CompositionKind = CompositionKind::OneOf;
///
///     fn variants() -> Vec<Variant<Self>> {
///         vec![Variant::of("count", Limit::Count), Variant::of("label", Limit::Label)]
///     }
/// }
///
/// impl Encode for Limit {
///     fn fragments(&self) -> EncodeResult<Vec<Value>> {
///         match self {
///             Limit::Count(count) => count.fragments(),
///             Limit::Label(label) => label.fragments(),
///         }
///     }
/// }
///
/// let limit = UnionValue::<Limit>::decode(b"10").unwrap();
/// assert_eq!(limit.matched(), ["count"]);
/// assert_eq!(limit.encode().unwrap(), b"10");
/// ```
pub trait Union: Sized {
    /// Composition keyword governing the alternatives
    const KIND: CompositionKind;

    /// Alternatives in declaration order
    fn variants() -> Vec<Variant<Self>>;
}

impl<U: Union> Decode for UnionValue<U> {
    fn decode_value(value: &Value) -> DecodeResult<Self> {
        let variants = U::variants();
        resolve(
            U::KIND,
            variants
                .iter()
                .map(|variant| (variant.name().to_string(), variant.attempt(value))),
        )
    }
}
