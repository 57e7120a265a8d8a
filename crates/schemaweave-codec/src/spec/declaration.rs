//! Serializable form of a [`FieldSpec`]
//!
//! This is the configuration object a generator or a hand-written file
//! supplies:
//!
//! ```yaml
//! knownKeys: [id, name]
//! requiredKeys: [id]
//! constraints: {type: book}
//! constPolicy: strict
//! patternRules:
//!   - {pattern: "^x-", bucket: extensions}
//! additionalPropertiesBucket: true
//! ```
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use super::{AdditionalProperties, Composition, ConstPolicy, FieldSpec};
use crate::error::SpecError;
use crate::shape::Shape;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One pattern rule as declared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRuleDecl {
    pub pattern: String,
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
}

/// Declarative field spec, as read from JSON or YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSpecDecl {
    pub known_keys: Vec<String>,
    pub required_keys: Vec<String>,
    pub constraints: Map<String, Value>,
    pub const_policy: ConstPolicy,
    pub pattern_rules: Vec<PatternRuleDecl>,
    pub additional_properties_bucket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_shape: Option<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<Composition>,
}

impl TryFrom<FieldSpecDecl> for FieldSpec {
    type Error = SpecError;

    fn try_from(decl: FieldSpecDecl) -> Result<Self, Self::Error> {
        let mut builder = FieldSpec::builder()
            .known(decl.known_keys)
            .required(decl.required_keys)
            .const_policy(decl.const_policy);

        for (key, value) in decl.constraints {
            builder = builder.constant(key, value);
        }
        for rule in decl.pattern_rules {
            builder = builder.pattern_with_shape(rule.pattern, rule.bucket, rule.shape.unwrap_or(Shape::Any));
        }
        if decl.additional_properties_bucket {
            builder = builder.additional(decl.additional_shape.unwrap_or(Shape::Any));
        }
        if let Some(composition) = decl.composition {
            builder = builder.composition(composition);
        }

        builder.build()
    }
}

impl From<FieldSpec> for FieldSpecDecl {
    fn from(spec: FieldSpec) -> Self {
        let (additional_properties_bucket, additional_shape) = match spec.additional {
            AdditionalProperties::Forbidden => (false, None),
            AdditionalProperties::Bucket(shape) => match *shape {
                Shape::Any => (true, None),
                shape => (true, Some(shape)),
            },
        };

        Self {
            known_keys: spec.known,
            required_keys: spec.required,
            constraints: spec.constants.into_iter().collect(),
            const_policy: spec.const_policy,
            pattern_rules: spec
                .patterns
                .into_iter()
                .map(|rule| PatternRuleDecl {
                    pattern: rule.pattern,
                    bucket: rule.bucket,
                    shape: match rule.shape {
                        Shape::Any => None,
                        shape => Some(shape),
                    },
                })
                .collect(),
            additional_properties_bucket,
            additional_shape,
            composition: spec.composition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_declaration_from_json() {
        let spec: FieldSpec = serde_json::from_value(json!({
            "knownKeys": ["id"],
            "requiredKeys": ["id"],
            "constraints": {"type": "book"},
            "constPolicy": "strict",
            "patternRules": [{"pattern": "^x-", "bucket": "extensions"}],
            "additionalPropertiesBucket": true
        }))
        .unwrap();

        assert_eq!(spec.known_keys(), ["id"]);
        assert_eq!(spec.const_policy(), ConstPolicy::Strict);
        assert_eq!(spec.bucket_names(), ["extensions"]);
        assert!(spec.allows_additional());
        assert_eq!(spec.constants()[0].1, json!("book"));
    }

    #[test]
    fn test_declaration_defaults() {
        let spec: FieldSpec = serde_json::from_value(json!({})).unwrap();
        assert!(spec.known_keys().is_empty());
        assert!(!spec.allows_additional());
        assert_eq!(spec.const_policy(), ConstPolicy::Lenient);
    }

    #[test]
    fn test_declaration_rejects_bad_pattern() {
        let result: Result<FieldSpec, _> = serde_json::from_value(json!({
            "patternRules": [{"pattern": "(", "bucket": "broken"}]
        }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("invalid pattern"), "{}", message);
    }

    #[test]
    fn test_declaration_serializes_back() {
        let spec = FieldSpec::builder()
            .known(["id"])
            .pattern_with_shape("^x-", "extensions", Shape::String)
            .additional_any()
            .build()
            .unwrap();
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["knownKeys"], json!(["id"]));
        assert_eq!(value["patternRules"][0]["shape"], json!({"type": "string"}));
        assert_eq!(value["additionalPropertiesBucket"], json!(true));
        assert!(value.get("additionalShape").is_none());
    }
}
