//! Builder for [`FieldSpec`]
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use super::{AdditionalProperties, Composition, ConstPolicy, FieldSpec, PatternRule};
use crate::error::{SpecError, SpecResult};
use crate::shape::Shape;
use serde_json::Value;

/// Const literal as handed to the builder
#[derive(Debug, Clone)]
enum ConstSource {
    Value(Value),
    Raw(String),
}

/// Builder collecting a spec declaration; all checks run in [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct FieldSpecBuilder {
    known: Vec<String>,
    required: Vec<String>,
    constants: Vec<(String, ConstSource)>,
    const_policy: ConstPolicy,
    patterns: Vec<(String, String, Shape)>,
    additional: Option<Shape>,
    composition: Option<Composition>,
}

impl FieldSpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare keys mapped onto the typed known-fields slot
    pub fn known<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.known.contains(&key) {
                self.known.push(key);
            }
        }
        self
    }

    /// Declare keys that must be present
    pub fn required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.required.contains(&key) {
                self.required.push(key);
            }
        }
        self
    }

    /// Pin `key` to an exact value
    pub fn constant(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_constant(key.into(), ConstSource::Value(value));
        self
    }

    /// Pin `key` to an exact value given as raw JSON text, e.g. `"\"book\""`
    pub fn constant_raw(mut self, key: impl Into<String>, literal: impl Into<String>) -> Self {
        self.set_constant(key.into(), ConstSource::Raw(literal.into()));
        self
    }

    fn set_constant(&mut self, key: String, source: ConstSource) {
        match self.constants.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = source,
            None => self.constants.push((key, source)),
        }
    }

    pub fn const_policy(mut self, policy: ConstPolicy) -> Self {
        self.const_policy = policy;
        self
    }

    /// Route keys matching `pattern` into `bucket`, accepting any value
    pub fn pattern(self, pattern: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.pattern_with_shape(pattern, bucket, Shape::Any)
    }

    /// Route keys matching `pattern` into `bucket`; values must decode as `shape`
    pub fn pattern_with_shape(
        mut self,
        pattern: impl Into<String>,
        bucket: impl Into<String>,
        shape: Shape,
    ) -> Self {
        self.patterns.push((pattern.into(), bucket.into(), shape));
        self
    }

    /// Collect unmatched keys whose values decode as `shape`
    pub fn additional(mut self, shape: Shape) -> Self {
        self.additional = Some(shape);
        self
    }

    /// Collect unmatched keys of any value
    pub fn additional_any(self) -> Self {
        self.additional(Shape::Any)
    }

    /// Reject unmatched keys (the default)
    pub fn forbid_additional(mut self) -> Self {
        self.additional = None;
        self
    }

    /// Attach a composition applied alongside the object routing
    pub fn composition(mut self, composition: Composition) -> Self {
        self.composition = Some(composition);
        self
    }

    pub fn build(self) -> SpecResult<FieldSpec> {
        let mut constants = Vec::with_capacity(self.constants.len());
        for (key, source) in self.constants {
            let value = match source {
                ConstSource::Value(value) => value,
                ConstSource::Raw(literal) => serde_json::from_str(&literal)
                    .map_err(|source| SpecError::InvalidConst {
                        key: key.clone(),
                        source,
                    })?,
            };
            constants.push((key, value));
        }

        for key in &self.required {
            let declared = self.known.contains(key) || constants.iter().any(|(k, _)| k == key);
            if !declared {
                return Err(SpecError::UnknownRequiredKey { key: key.clone() });
            }
        }

        let patterns = self
            .patterns
            .into_iter()
            .map(|(pattern, bucket, shape)| PatternRule::with_shape(&pattern, bucket, shape))
            .collect::<SpecResult<Vec<_>>>()?;

        let additional = match self.additional {
            Some(shape) => {
                shape.check()?;
                AdditionalProperties::Bucket(Box::new(shape))
            }
            None => AdditionalProperties::Forbidden,
        };

        if let Some(composition) = &self.composition {
            composition.check()?;
        }

        Ok(FieldSpec {
            known: self.known,
            required: self.required,
            constants,
            const_policy: self.const_policy,
            patterns,
            additional,
            composition: self.composition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{CompositionKind, VariantSpec};
    use serde_json::json;

    #[test]
    fn test_build_minimal() {
        let spec = FieldSpec::builder().known(["id"]).required(["id"]).build().unwrap();
        assert_eq!(spec.known_keys(), ["id"]);
        assert_eq!(spec.required_keys(), ["id"]);
        assert!(!spec.allows_additional());
        assert_eq!(spec.const_policy(), ConstPolicy::Lenient);
    }

    #[test]
    fn test_constant_raw_is_parsed() {
        let spec = FieldSpec::builder()
            .constant_raw("type", "\"book\"")
            .build()
            .unwrap();
        assert_eq!(spec.constants()[0], ("type".to_string(), json!("book")));
    }

    #[test]
    fn test_constant_raw_rejects_bad_json() {
        let error = FieldSpec::builder()
            .constant_raw("type", "book")
            .build()
            .unwrap_err();
        assert!(matches!(error, SpecError::InvalidConst { ref key, .. } if key == "type"));
    }

    #[test]
    fn test_later_constant_replaces_earlier() {
        let spec = FieldSpec::builder()
            .constant("type", json!("a"))
            .constant("type", json!("b"))
            .build()
            .unwrap();
        assert_eq!(spec.constants().len(), 1);
        assert_eq!(spec.constants()[0].1, json!("b"));
    }

    #[test]
    fn test_required_must_be_declared() {
        let error = FieldSpec::builder()
            .known(["id"])
            .required(["id", "name"])
            .build()
            .unwrap_err();
        assert!(matches!(error, SpecError::UnknownRequiredKey { ref key } if key == "name"));
    }

    #[test]
    fn test_required_may_name_a_const() {
        let spec = FieldSpec::builder()
            .constant("type", json!("book"))
            .required(["type"])
            .build();
        assert!(spec.is_ok());
    }

    #[test]
    fn test_invalid_pattern_fails_build() {
        let error = FieldSpec::builder().pattern("[", "bad").build().unwrap_err();
        assert!(matches!(error, SpecError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_composition_fails_build() {
        let error = FieldSpec::builder()
            .composition(Composition::new(CompositionKind::AnyOf, Vec::new()))
            .build()
            .unwrap_err();
        assert!(matches!(error, SpecError::EmptyComposition { kind: "anyOf" }));
    }

    #[test]
    fn test_composition_kept() {
        let spec = FieldSpec::builder()
            .additional_any()
            .composition(Composition::new(
                CompositionKind::OneOf,
                vec![VariantSpec::new("text", Shape::String)],
            ))
            .build()
            .unwrap();
        assert_eq!(spec.composition().unwrap().variants.len(), 1);
    }
}
