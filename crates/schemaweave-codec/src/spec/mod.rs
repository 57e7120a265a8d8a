//! Field specifications describing one object shape
//!
//! A [`FieldSpec`] is the static configuration a composed type is decoded and
//! encoded with: which keys land in the typed known-fields slot, which of
//! them are required, which keys are pinned to a literal, how the remaining
//! keys are routed into pattern buckets, and whether a catch-all bucket for
//! additional properties exists.
//!
//! Specs are built once, either through [`FieldSpec::builder`] or from a
//! JSON/YAML declaration (see [`FieldSpecDecl`]), and are immutable
//! afterwards.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod declaration;

pub use builder::FieldSpecBuilder;
pub use declaration::{FieldSpecDecl, PatternRuleDecl};

use crate::error::SpecResult;
use crate::pattern;
use crate::shape::Shape;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// What to do when a const-constrained key is absent from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstPolicy {
    /// A missing const key fails like a mismatching one
    Strict,
    /// Consts are only checked when the key is present
    #[default]
    Lenient,
}

/// Composition keyword joining several variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionKind {
    OneOf,
    AnyOf,
    AllOf,
}

impl CompositionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneOf => "oneOf",
            Self::AnyOf => "anyOf",
            Self::AllOf => "allOf",
        }
    }
}

impl fmt::Display for CompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named alternative in a declared composition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    pub name: String,
    pub shape: Shape,
}

impl VariantSpec {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// A declared `oneOf`/`anyOf`/`allOf` over variant shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    pub kind: CompositionKind,
    pub variants: Vec<VariantSpec>,
}

impl Composition {
    pub fn new(kind: CompositionKind, variants: Vec<VariantSpec>) -> Self {
        Self { kind, variants }
    }

    pub(crate) fn check(&self) -> SpecResult<()> {
        if self.variants.is_empty() {
            return Err(crate::error::SpecError::EmptyComposition {
                kind: self.kind.as_str(),
            });
        }
        self.variants.iter().try_for_each(|variant| variant.shape.check())
    }
}

/// One `(regex, bucket)` routing rule
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: String,
    regex: Regex,
    bucket: String,
    shape: Shape,
}

impl PatternRule {
    /// Create a rule whose bucket accepts any JSON value
    pub fn new(pattern: &str, bucket: impl Into<String>) -> SpecResult<Self> {
        Self::with_shape(pattern, bucket, Shape::Any)
    }

    /// Create a rule whose bucket values must decode as `shape`
    pub fn with_shape(pattern: &str, bucket: impl Into<String>, shape: Shape) -> SpecResult<Self> {
        shape.check()?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex: pattern::compile(pattern)?,
            bucket: bucket.into(),
            shape,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Whether unmatched keys are collected or rejected
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    /// Any unmatched key fails the decode
    Forbidden,
    /// Unmatched keys are collected; values must decode as the shape
    Bucket(Box<Shape>),
}

/// Declarative description of one object shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FieldSpecDecl", into = "FieldSpecDecl")]
pub struct FieldSpec {
    pub(crate) known: Vec<String>,
    pub(crate) required: Vec<String>,
    pub(crate) constants: Vec<(String, Value)>,
    pub(crate) const_policy: ConstPolicy,
    pub(crate) patterns: Vec<PatternRule>,
    pub(crate) additional: AdditionalProperties,
    pub(crate) composition: Option<Composition>,
}

impl FieldSpec {
    /// Start building a spec
    pub fn builder() -> FieldSpecBuilder {
        FieldSpecBuilder::new()
    }

    /// A spec with no known keys that collects every key as an additional
    /// property
    pub fn open() -> Self {
        Self {
            known: Vec::new(),
            required: Vec::new(),
            constants: Vec::new(),
            const_policy: ConstPolicy::default(),
            patterns: Vec::new(),
            additional: AdditionalProperties::Bucket(Box::new(Shape::Any)),
            composition: None,
        }
    }

    pub fn known_keys(&self) -> &[String] {
        &self.known
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required
    }

    pub fn constants(&self) -> &[(String, Value)] {
        &self.constants
    }

    pub fn const_policy(&self) -> ConstPolicy {
        self.const_policy
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        &self.patterns
    }

    pub fn additional(&self) -> &AdditionalProperties {
        &self.additional
    }

    pub fn composition(&self) -> Option<&Composition> {
        self.composition.as_ref()
    }

    pub fn is_known(&self, key: &str) -> bool {
        self.known.iter().any(|k| k == key)
    }

    pub fn is_const(&self, key: &str) -> bool {
        self.constants.iter().any(|(k, _)| k == key)
    }

    pub fn allows_additional(&self) -> bool {
        matches!(self.additional, AdditionalProperties::Bucket(_))
    }

    /// Bucket names in first-declaration order, without repeats
    pub fn bucket_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.patterns {
            if !names.contains(&rule.bucket()) {
                names.push(rule.bucket());
            }
        }
        names
    }

    /// Apply `policy` to this spec and to every object spec nested in its
    /// bucket shapes and composition
    pub fn set_const_policy(&mut self, policy: ConstPolicy) {
        self.const_policy = policy;
        for rule in &mut self.patterns {
            rule.shape.set_const_policy(policy);
        }
        if let AdditionalProperties::Bucket(shape) = &mut self.additional {
            shape.set_const_policy(policy);
        }
        if let Some(composition) = &mut self.composition {
            for variant in &mut composition.variants {
                variant.shape.set_const_policy(policy);
            }
        }
    }

    /// The literal fragment every encoded value starts with
    pub fn const_fragment(&self) -> Value {
        let map: Map<String, Value> = self
            .constants
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(map)
    }
}
