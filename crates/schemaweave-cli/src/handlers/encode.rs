//! Encode command handler

use super::decode::entry_count;
use super::utils::{effective_policy, load_shape, read_input, resolve_shape_path};
use crate::cli::{EncodeArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemaweave_codec::Encode;
use tracing::{info, instrument};

/// Handle the encode command
///
/// The input is decoded against the shape, then merged back from its
/// fragments. JSON output is the canonical byte form of the document.
#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn handle_encode(args: EncodeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let shape_path = resolve_shape_path(args.shape.as_deref(), config)?;
    let shape = load_shape(shape_path, effective_policy(args.const_policy, config))?;
    let input = read_input(&args.input)?;

    let _timer = Timer::with_details("encode", &format!("shape: {}", shape.name()));
    let decoded = shape.decode(&input)?;
    let value = decoded.to_value()?;
    info!(entries = entry_count(&decoded), "Document re-encoded");

    let text = match output.format() {
        OutputFormat::Yaml => serde_yaml::to_string(&value)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&value)?,
        _ if args.pretty => serde_json::to_string_pretty(&value)?,
        _ => serde_json::to_string(&value)?,
    };

    output.write(&text)?;
    if !text.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}
