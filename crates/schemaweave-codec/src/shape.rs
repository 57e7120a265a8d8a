//! Declared value shapes and the dynamic decoder
//!
//! A [`Shape`] describes what one JSON value may be: a scalar kind, an
//! array, an object governed by a [`FieldSpec`], or a composition of
//! variant shapes. Shapes are used for union variants, for bucket values,
//! and on their own when the target type is only known at runtime (for
//! example when a declaration file is loaded by the command line tool).
//!
//! Decoding against a shape yields a [`Decoded`] tree, which encodes back
//! through the same merge rules as the typed wrappers.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::decode::route::{self, Routed};
use crate::decode::union::{self, UnionValue};
use crate::encode::Encode;
use crate::error::{DecodeError, DecodeResult, EncodeResult, SpecError, SpecResult};
use crate::raw;
use crate::spec::{CompositionKind, ConstPolicy, FieldSpec, VariantSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a JSON value is allowed to be
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    Any,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Box<Shape>>,
    },
    Object(FieldSpec),
    OneOf {
        variants: Vec<VariantSpec>,
    },
    AnyOf {
        variants: Vec<VariantSpec>,
    },
    AllOf {
        variants: Vec<VariantSpec>,
    },
}

impl Shape {
    /// Array whose items decode as `items`
    pub fn array_of(items: Shape) -> Self {
        Self::Array {
            items: Some(Box::new(items)),
        }
    }

    /// Composition of `variants` under `kind`
    pub fn composed(kind: CompositionKind, variants: Vec<VariantSpec>) -> Self {
        match kind {
            CompositionKind::OneOf => Self::OneOf { variants },
            CompositionKind::AnyOf => Self::AnyOf { variants },
            CompositionKind::AllOf => Self::AllOf { variants },
        }
    }

    /// Composition keyword and variants, for composed shapes
    pub fn composition(&self) -> Option<(CompositionKind, &[VariantSpec])> {
        match self {
            Self::OneOf { variants } => Some((CompositionKind::OneOf, variants)),
            Self::AnyOf { variants } => Some((CompositionKind::AnyOf, variants)),
            Self::AllOf { variants } => Some((CompositionKind::AllOf, variants)),
            _ => None,
        }
    }

    /// Short name used in summaries
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array { .. } => "array",
            Self::Object(_) => "object",
            Self::OneOf { .. } => "oneOf",
            Self::AnyOf { .. } => "anyOf",
            Self::AllOf { .. } => "allOf",
        }
    }

    /// Reject compositions without variants, at any depth. Object specs are
    /// checked when they are built.
    pub fn check(&self) -> SpecResult<()> {
        match self {
            Self::Array { items: Some(items) } => items.check(),
            _ => match self.composition() {
                Some((kind, [])) => Err(SpecError::EmptyComposition { kind: kind.as_str() }),
                Some((_, variants)) => variants.iter().try_for_each(|v| v.shape.check()),
                None => Ok(()),
            },
        }
    }

    /// Apply `policy` to every object spec in this shape
    pub fn set_const_policy(&mut self, policy: ConstPolicy) {
        match self {
            Self::Object(spec) => spec.set_const_policy(policy),
            Self::Array { items: Some(items) } => items.set_const_policy(policy),
            Self::OneOf { variants } | Self::AnyOf { variants } | Self::AllOf { variants } => {
                for variant in variants {
                    variant.shape.set_const_policy(policy);
                }
            }
            _ => {}
        }
    }

    /// Load a shape declaration from JSON text
    pub fn from_json_str(text: &str) -> SpecResult<Self> {
        let shape: Shape =
            serde_json::from_str(text).map_err(|e| SpecError::Declaration(e.to_string()))?;
        shape.check()?;
        Ok(shape)
    }

    /// Load a shape declaration from YAML text
    pub fn from_yaml_str(text: &str) -> SpecResult<Self> {
        let shape: Shape =
            serde_yaml::from_str(text).map_err(|e| SpecError::Declaration(e.to_string()))?;
        shape.check()?;
        Ok(shape)
    }

    /// Decode raw JSON bytes against this shape
    pub fn decode(&self, raw: &[u8]) -> DecodeResult<Decoded> {
        self.decode_value(&raw::parse(raw)?)
    }

    /// Decode an already-parsed value against this shape
    pub fn decode_value(&self, value: &Value) -> DecodeResult<Decoded> {
        match self {
            Self::Any => Ok(Decoded::plain(value)),
            Self::Null => expect(value, "null", Value::is_null),
            Self::Boolean => expect(value, "boolean", Value::is_boolean),
            Self::Integer => expect(value, "integer", is_integer),
            Self::Number => expect(value, "number", Value::is_number),
            Self::String => expect(value, "string", Value::is_string),
            Self::Array { items } => {
                let Value::Array(elements) = value else {
                    return Err(mismatch("array", value));
                };
                if let Some(items) = items {
                    for (index, element) in elements.iter().enumerate() {
                        items
                            .decode_value(element)
                            .map_err(|e| DecodeError::at(format!("[{}]", index), e))?;
                    }
                }
                Ok(Decoded::plain(value))
            }
            Self::Object(spec) => decode_object(value, spec),
            Self::OneOf { variants } => decode_union(value, CompositionKind::OneOf, variants).map(Decoded::Union),
            Self::AnyOf { variants } => decode_union(value, CompositionKind::AnyOf, variants).map(Decoded::Union),
            Self::AllOf { variants } => decode_union(value, CompositionKind::AllOf, variants).map(Decoded::Union),
        }
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn mismatch(expected: &'static str, value: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        expected,
        found: DecodeError::kind_of(value),
    }
}

fn expect(value: &Value, expected: &'static str, accepts: fn(&Value) -> bool) -> DecodeResult<Decoded> {
    if accepts(value) {
        Ok(Decoded::plain(value))
    } else {
        Err(mismatch(expected, value))
    }
}

fn decode_object(value: &Value, spec: &FieldSpec) -> DecodeResult<Decoded> {
    let object = route::object_input(value)?;
    let routed = route::route(&object, spec)?;
    let union = decode_composition(value, spec)?;
    Ok(Decoded::Object { routed, union })
}

/// Resolve the composition attached to `spec`, if any, against the whole value
pub(crate) fn decode_composition(value: &Value, spec: &FieldSpec) -> DecodeResult<Option<UnionValue<Decoded>>> {
    spec.composition()
        .map(|composition| decode_union(value, composition.kind, &composition.variants))
        .transpose()
}

fn decode_union(value: &Value, kind: CompositionKind, variants: &[VariantSpec]) -> DecodeResult<UnionValue<Decoded>> {
    union::resolve(
        kind,
        variants
            .iter()
            .map(|variant| (variant.name.clone(), variant.shape.decode_value(value))),
    )
}

/// Result of decoding against a [`Shape`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Decoded {
    /// A value accepted as-is (scalar, array or `any`)
    Plain { value: Value },
    /// An object routed by its spec, plus the spec's composition if any
    Object {
        routed: Routed,
        #[serde(skip_serializing_if = "Option::is_none")]
        union: Option<UnionValue<Decoded>>,
    },
    /// A composition of variants
    Union(UnionValue<Decoded>),
}

impl Decoded {
    fn plain(value: &Value) -> Self {
        Self::Plain {
            value: value.clone(),
        }
    }

    pub fn as_routed(&self) -> Option<&Routed> {
        match self {
            Self::Object { routed, .. } => Some(routed),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionValue<Decoded>> {
        match self {
            Self::Object { union, .. } => union.as_ref(),
            Self::Union(union) => Some(union),
            Self::Plain { .. } => None,
        }
    }
}

impl Encode for Decoded {
    fn fragments(&self) -> EncodeResult<Vec<Value>> {
        match self {
            Self::Plain { value } => Ok(vec![value.clone()]),
            Self::Object { routed, union } => {
                let mut fragments = routed.fragments()?;
                if let Some(union) = union {
                    fragments.extend(union.fragments()?);
                }
                Ok(fragments)
            }
            Self::Union(union) => union.fragments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book_shape() -> Shape {
        Shape::Object(
            FieldSpec::builder()
                .known(["id", "title"])
                .required(["id"])
                .constant("type", json!("book"))
                .pattern("^x-", "extensions")
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_scalar_shapes() {
        assert!(Shape::String.decode(b"\"a\"").is_ok());
        assert!(Shape::Integer.decode(b"3").is_ok());
        assert!(Shape::Integer.decode(b"3.0").is_ok());
        assert!(matches!(
            Shape::Integer.decode(b"3.5"),
            Err(DecodeError::TypeMismatch { expected: "integer", found: "number" })
        ));
        assert!(Shape::Null.decode(b"null").is_ok());
        assert!(Shape::Boolean.decode(b"1").is_err());
    }

    #[test]
    fn test_array_items_checked() {
        let shape = Shape::array_of(Shape::String);
        assert!(shape.decode(br#"["a","b"]"#).is_ok());
        let error = shape.decode(br#"["a",2]"#).unwrap_err();
        assert!(matches!(error, DecodeError::InvalidEntry { ref key, .. } if key == "[1]"));
    }

    #[test]
    fn test_object_round_trip() {
        let shape = book_shape();
        let decoded = shape.decode(br#"{"id":"1","type":"book","x-a":true}"#).unwrap();
        let encoded = decoded.encode().unwrap();
        assert_eq!(String::from_utf8(encoded.clone()).unwrap(), r#"{"type":"book","id":"1","x-a":true}"#);
        assert_eq!(shape.decode(&encoded).unwrap(), decoded);
    }

    #[test]
    fn test_string_or_object() {
        let shape = Shape::composed(
            CompositionKind::OneOf,
            vec![
                VariantSpec::new("text", Shape::String),
                VariantSpec::new("book", book_shape()),
            ],
        );

        let text = shape.decode(b"\"hello\"").unwrap();
        assert_eq!(text.as_union().unwrap().matched(), ["text"]);
        assert_eq!(text.encode().unwrap(), b"\"hello\"");

        let book = shape.decode(br#"{"id":"7"}"#).unwrap();
        assert_eq!(book.as_union().unwrap().matched(), ["book"]);
        assert_eq!(book.to_value().unwrap(), json!({"type": "book", "id": "7"}));
    }

    #[test]
    fn test_object_with_composition() {
        let spec = FieldSpec::builder()
            .known(["kind"])
            .additional_any()
            .composition(crate::spec::Composition::new(
                CompositionKind::AnyOf,
                vec![
                    VariantSpec::new("named", Shape::Object(FieldSpec::builder().known(["name"]).required(["name"]).additional_any().build().unwrap())),
                    VariantSpec::new("sized", Shape::Object(FieldSpec::builder().known(["size"]).required(["size"]).additional_any().build().unwrap())),
                ],
            ))
            .build()
            .unwrap();
        let shape = Shape::Object(spec);

        let decoded = shape.decode(br#"{"kind":"k","name":"n"}"#).unwrap();
        assert_eq!(decoded.as_union().unwrap().matched(), ["named"]);
        assert_eq!(decoded.to_value().unwrap(), json!({"kind": "k", "name": "n"}));

        assert!(matches!(shape.decode(br#"{"kind":"k"}"#), Err(DecodeError::AnyOfNoMatch { .. })));
    }

    #[test]
    fn test_check_rejects_nested_empty_composition() {
        let shape = Shape::array_of(Shape::OneOf { variants: Vec::new() });
        assert!(matches!(shape.check(), Err(SpecError::EmptyComposition { kind: "oneOf" })));
    }

    #[test]
    fn test_declaration_round_trip() {
        let text = r#"{"type":"oneOf","variants":[{"name":"s","shape":{"type":"string"}},{"name":"o","shape":{"type":"object","knownKeys":["id"]}}]}"#;
        let shape = Shape::from_json_str(text).unwrap();
        assert_eq!(shape.name(), "oneOf");
        let back = serde_json::to_value(&shape).unwrap();
        assert_eq!(back["variants"][1]["shape"]["knownKeys"], json!(["id"]));
        assert_eq!(back["variants"][1]["shape"]["type"], json!("object"));
    }

    #[test]
    fn test_const_policy_override_reaches_variants() {
        let mut shape = Shape::composed(
            CompositionKind::OneOf,
            vec![
                VariantSpec::new("text", Shape::String),
                VariantSpec::new("book", book_shape()),
            ],
        );
        assert!(shape.decode(br#"{"id":"7"}"#).is_ok());

        shape.set_const_policy(ConstPolicy::Strict);
        assert!(matches!(
            shape.decode(br#"{"id":"7"}"#),
            Err(DecodeError::OneOfCardinality { matched: 0, .. })
        ));
        assert!(shape.decode(br#"{"id":"7","type":"book"}"#).is_ok());
    }

    #[test]
    fn test_yaml_declaration() {
        let shape = Shape::from_yaml_str(
            "type: object\nknownKeys: [id]\nrequiredKeys: [id]\nconstraints:\n  type: book\nconstPolicy: strict\n",
        )
        .unwrap();
        let Shape::Object(spec) = &shape else {
            panic!("expected object shape");
        };
        assert_eq!(spec.constants()[0].1, json!("book"));
        assert!(matches!(shape.decode(br#"{"id":"1"}"#), Err(DecodeError::ConstMismatch { actual: None, .. })));
    }
}
