//! Unit tests for declared shapes
//!
//! Declarations are loaded from JSON and YAML text and then used to decode
//! real documents, the way the command line tool uses them.

use pretty_assertions::assert_eq;
use schemaweave_codec::{
    CompositionKind, ConstPolicy, DecodeError, Encode, FieldSpec, Shape, SpecError,
};
use serde_json::json;

const API_YAML: &str = r#"
type: object
knownKeys: [openapi, info, paths]
requiredKeys: [openapi, info]
constraints:
  openapi: "3.1.0"
constPolicy: strict
patternRules:
  - pattern: "^x-"
    bucket: extensions
additionalPropertiesBucket: false
"#;

const CONTACT_JSON: &str = r#"{
  "type": "oneOf",
  "variants": [
    {"name": "email", "shape": {"type": "string"}},
    {
      "name": "card",
      "shape": {
        "type": "object",
        "knownKeys": ["name", "email"],
        "requiredKeys": ["name"],
        "patternRules": [
          {"pattern": "^phone-", "bucket": "phones", "shape": {"type": "string"}}
        ]
      }
    }
  ]
}"#;

#[cfg(test)]
mod yaml_declarations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_object_shape() {
        let shape = Shape::from_yaml_str(API_YAML).unwrap();
        let Shape::Object(spec) = &shape else {
            panic!("expected an object shape, got {}", shape.name());
        };
        assert_eq!(spec.known_keys(), ["openapi", "info", "paths"]);
        assert_eq!(spec.const_policy(), ConstPolicy::Strict);
        assert_eq!(spec.bucket_names(), ["extensions"]);
        assert!(!spec.allows_additional());
    }

    #[test]
    fn test_decode_with_loaded_shape() {
        let shape = Shape::from_yaml_str(API_YAML).unwrap();
        let decoded = shape
            .decode(br#"{"openapi":"3.1.0","info":{"title":"t"},"x-logo":"l"}"#)
            .unwrap();
        let routed = decoded.as_routed().unwrap();
        assert_eq!(routed.buckets.get("extensions").unwrap().get("x-logo"), Some(&json!("l")));
        assert!(routed.known.contains_key("openapi"));
    }

    #[test]
    fn test_loaded_strict_const() {
        let shape = Shape::from_yaml_str(API_YAML).unwrap();
        assert!(matches!(
            shape.decode(br#"{"openapi":"3.0.0","info":{}}"#),
            Err(DecodeError::ConstMismatch { .. })
        ));
        assert!(matches!(
            shape.decode(br#"{"info":{}}"#),
            Err(DecodeError::RequiredKeyMissing { ref key }) if key == "openapi"
        ));
    }

    #[test]
    fn test_loaded_spec_forbids_additional() {
        let shape = Shape::from_yaml_str(API_YAML).unwrap();
        let error = shape
            .decode(br#"{"openapi":"3.1.0","info":{},"servers":[],"tags":[]}"#)
            .unwrap_err();
        assert!(matches!(
            error,
            DecodeError::AdditionalPropertiesNotAllowed { ref keys } if keys.len() == 2
        ));
    }
}

#[cfg(test)]
mod json_declarations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_composition() {
        let shape = Shape::from_json_str(CONTACT_JSON).unwrap();
        let (kind, variants) = shape.composition().unwrap();
        assert_eq!(kind, CompositionKind::OneOf);
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].shape.name(), "object");
    }

    #[test]
    fn test_decode_either_variant() {
        let shape = Shape::from_json_str(CONTACT_JSON).unwrap();

        let email = shape.decode(br#""a@example.com""#).unwrap();
        assert_eq!(email.as_union().unwrap().matched(), ["email"]);

        let card = shape
            .decode(br#"{"name":"ada","phone-home":"1","phone-work":"2"}"#)
            .unwrap();
        assert_eq!(card.as_union().unwrap().matched(), ["card"]);
        assert_eq!(
            card.to_value().unwrap(),
            json!({"name": "ada", "phone-home": "1", "phone-work": "2"})
        );
    }

    #[test]
    fn test_bucket_value_shape_enforced() {
        let shape = Shape::from_json_str(CONTACT_JSON).unwrap();
        let error = shape.decode(br#"{"name":"ada","phone-home":1}"#).unwrap_err();
        let DecodeError::OneOfCardinality { attempts, .. } = error else {
            panic!("expected a oneOf failure");
        };
        let card = attempts.iter().find(|a| a.variant == "card").unwrap();
        assert!(matches!(*card.error, DecodeError::InvalidEntry { ref key, .. } if key == "phone-home"));
    }

    #[test]
    fn test_error_lists_every_variant() {
        let shape = Shape::from_json_str(CONTACT_JSON).unwrap();
        let message = shape.decode(b"42").unwrap_err().to_string();
        assert!(message.contains("email"), "{}", message);
        assert!(message.contains("card"), "{}", message);
    }
}

#[cfg(test)]
mod invalid_declarations {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_composition() {
        let error = Shape::from_json_str(r#"{"type":"anyOf","variants":[]}"#).unwrap_err();
        assert!(matches!(error, SpecError::EmptyComposition { kind: "anyOf" }));
    }

    #[test]
    fn test_required_key_not_declared() {
        let error = Shape::from_json_str(r#"{"type":"object","requiredKeys":["id"]}"#).unwrap_err();
        assert!(error.to_string().contains("id"), "{}", error);
    }

    #[test]
    fn test_unknown_shape_type() {
        assert!(matches!(
            Shape::from_yaml_str("type: tuple"),
            Err(SpecError::Declaration(_))
        ));
    }

    #[test]
    fn test_builder_spec_serializes_to_loadable_declaration() {
        let spec = FieldSpec::builder()
            .known(["id"])
            .required(["id"])
            .constant("kind", json!("pet"))
            .pattern("^x-", "extensions")
            .build()
            .unwrap();
        let text = serde_json::to_string(&Shape::Object(spec)).unwrap();
        let reloaded = Shape::from_json_str(&text).unwrap();
        let decoded = reloaded.decode(br#"{"id":"1","x-a":true}"#).unwrap();
        assert_eq!(decoded.to_value().unwrap(), json!({"kind": "pet", "id": "1", "x-a": true}));
    }
}
