//! Check command handler

use super::utils::load_shape;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use crate::summary::ShapeSummary;
use tracing::info;

/// Handle the check command
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Checking shape: {}", args.shape_file.display()))?;

    let shape = load_shape(&args.shape_file, config.codec.const_policy)?;
    let summary = ShapeSummary::of(&shape);
    info!(shapes = summary.node_count(), "Shape declaration is valid");

    output.section("Shape")?;
    output.summary(&summary)?;

    for warning in summary.warnings() {
        tracing::warn!(%warning, "Suspicious shape");
        output.warning(&warning)?;
    }

    if args.detailed {
        output.section("Normalized declaration")?;
        output.data(&shape)?;
    }

    output.success(&format!(
        "✓ Shape is valid ({} shape{})",
        summary.node_count(),
        if summary.node_count() == 1 { "" } else { "s" }
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use crate::output::test_support::SharedBuffer;
    use std::fs;

    fn check(content: &str, format: OutputFormat, detailed: bool) -> Result<String> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.yaml");
        fs::write(&path, content).unwrap();

        let buffer = SharedBuffer::default();
        let mut output = OutputWriter::with_writer(format, false, false, 0, Box::new(buffer.clone()));
        handle_check(
            CheckArgs {
                shape_file: path,
                detailed,
            },
            &Config::default(),
            &mut output,
        )?;
        Ok(buffer.contents())
    }

    #[test]
    fn test_check_valid_shape() {
        let text = check(
            "type: object\nknownKeys: [id]\nrequiredKeys: [id]\n",
            OutputFormat::Human,
            false,
        )
        .unwrap();
        assert!(text.contains("object\n  known: id\n  required: id\n  additional: forbidden\n"));
        assert!(text.ends_with("✓ Shape is valid (1 shape)\n"));
    }

    #[test]
    fn test_check_detailed_prints_declaration() {
        let text = check(
            "type: array\nitems: {type: integer}\n",
            OutputFormat::Human,
            true,
        )
        .unwrap();
        assert!(text.contains("=== Normalized declaration ==="));
        assert!(text.contains("{\n  \"type\": \"array\",\n  \"items\": {\n    \"type\": \"integer\"\n  }\n}\n"));
        assert!(text.ends_with("✓ Shape is valid (2 shapes)\n"));
    }

    #[test]
    fn test_check_warns_on_object_without_keys() {
        let text = check("type: object\n", OutputFormat::Human, false).unwrap();
        assert!(text.contains("WARNING: $: object accepts no keys, only {} decodes\n"));
        assert!(text.ends_with("✓ Shape is valid (1 shape)\n"));
    }

    #[test]
    fn test_check_json_summary() {
        let text = check("type: string\n", OutputFormat::Json, false).unwrap();
        assert_eq!(text, "{\"type\":\"string\"}\n");
    }

    #[test]
    fn test_check_rejects_unknown_required_key() {
        let err = check(
            "type: object\nknownKeys: [id]\nrequiredKeys: [name]\n",
            OutputFormat::Human,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Spec(_)));
        assert_eq!(err.exit_code(), 4);
    }
}
