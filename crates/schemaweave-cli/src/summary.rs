//! Serializable summaries of shape declarations, printed by `check`

use schemaweave_codec::{AdditionalProperties, CompositionKind, ConstPolicy, FieldSpec, Shape};
use serde::Serialize;

/// Summary of one shape, nested for arrays and compositions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ShapeSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantSummary>,
}

/// Routing rules of an object shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub known_keys: Vec<String>,
    pub required_keys: Vec<String>,
    pub constants: Vec<String>,
    pub const_policy: ConstPolicy,
    pub pattern_rules: Vec<RuleSummary>,
    /// Shape name of the additional-properties bucket, `None` when forbidden
    pub additional: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub pattern: String,
    pub bucket: String,
    pub shape: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSummary {
    pub name: String,
    pub shape: ShapeSummary,
}

impl ShapeSummary {
    pub fn of(shape: &Shape) -> Self {
        let mut summary = Self {
            kind: shape.name(),
            object: None,
            items: None,
            composition: None,
            variants: Vec::new(),
        };

        match shape {
            Shape::Object(spec) => {
                summary.object = Some(ObjectSummary::of(spec));
                if let Some(composition) = spec.composition() {
                    summary.composition = Some(composition.kind);
                    summary.variants = composition
                        .variants
                        .iter()
                        .map(|v| VariantSummary {
                            name: v.name.clone(),
                            shape: Self::of(&v.shape),
                        })
                        .collect();
                }
            }
            Shape::Array { items: Some(items) } => {
                summary.items = Some(Box::new(Self::of(items)));
            }
            other => {
                if let Some((kind, variants)) = other.composition() {
                    summary.composition = Some(kind);
                    summary.variants = variants
                        .iter()
                        .map(|v| VariantSummary {
                            name: v.name.clone(),
                            shape: Self::of(&v.shape),
                        })
                        .collect();
                }
            }
        }

        summary
    }

    /// Number of shapes in this tree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.items.as_ref().map_or(0, |items| items.node_count())
            + self.variants.iter().map(|v| v.shape.node_count()).sum::<usize>()
    }

    /// One message per object that can only ever decode `{}`
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        self.collect_warnings("$", &mut warnings);
        warnings
    }

    fn collect_warnings(&self, path: &str, warnings: &mut Vec<String>) {
        if let Some(object) = &self.object {
            if self.composition.is_none() && object.accepts_no_keys() {
                warnings.push(format!("{}: object accepts no keys, only {{}} decodes", path));
            }
        }
        if let Some(items) = &self.items {
            items.collect_warnings(&format!("{}[]", path), warnings);
        }
        for variant in &self.variants {
            variant.shape.collect_warnings(&format!("{}.{}", path, variant.name), warnings);
        }
    }

    /// Indented human-readable rendering
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        out.push_str(self.kind);
        out.push('\n');

        if let Some(object) = &self.object {
            object.render_into(out, depth + 1);
        }
        if let Some(items) = &self.items {
            out.push_str(&format!("{}  items: ", pad));
            items.render_into(out, depth + 1);
        }
        if let Some(kind) = self.composition {
            out.push_str(&format!("{}  {}:\n", pad, kind));
            for variant in &self.variants {
                out.push_str(&format!("{}    - {}: ", pad, variant.name));
                variant.shape.render_into(out, depth + 2);
            }
        }
    }
}

impl ObjectSummary {
    pub fn of(spec: &FieldSpec) -> Self {
        Self {
            known_keys: spec.known_keys().to_vec(),
            required_keys: spec.required_keys().to_vec(),
            constants: spec
                .constants()
                .iter()
                .map(|(key, value)| format!("{} = {}", key, value))
                .collect(),
            const_policy: spec.const_policy(),
            pattern_rules: spec
                .pattern_rules()
                .iter()
                .map(|rule| RuleSummary {
                    pattern: rule.pattern().to_string(),
                    bucket: rule.bucket().to_string(),
                    shape: rule.shape().name(),
                })
                .collect(),
            additional: match spec.additional() {
                AdditionalProperties::Forbidden => None,
                AdditionalProperties::Bucket(shape) => Some(shape.name()),
            },
        }
    }

    fn accepts_no_keys(&self) -> bool {
        self.known_keys.is_empty()
            && self.constants.is_empty()
            && self.pattern_rules.is_empty()
            && self.additional.is_none()
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        if !self.known_keys.is_empty() {
            out.push_str(&format!("{}known: {}\n", pad, self.known_keys.join(", ")));
        }
        if !self.required_keys.is_empty() {
            out.push_str(&format!("{}required: {}\n", pad, self.required_keys.join(", ")));
        }
        if !self.constants.is_empty() {
            let policy = match self.const_policy {
                ConstPolicy::Strict => "strict",
                ConstPolicy::Lenient => "lenient",
            };
            out.push_str(&format!("{}const ({}): {}\n", pad, policy, self.constants.join(", ")));
        }
        for rule in &self.pattern_rules {
            out.push_str(&format!("{}pattern {} -> {} ({})\n", pad, rule.pattern, rule.bucket, rule.shape));
        }
        out.push_str(&format!("{}additional: {}\n", pad, self.additional.unwrap_or("forbidden")));
    }
}
