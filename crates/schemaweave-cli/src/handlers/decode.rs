//! Decode command handler

use super::utils::{effective_policy, load_shape, read_input, resolve_shape_path};
use crate::cli::DecodeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schemaweave_codec::{Decoded, Routed};
use tracing::{info, instrument};

/// Handle the decode command
#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn handle_decode(args: DecodeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let shape_path = resolve_shape_path(args.shape.as_deref(), config)?;
    output.info(&format!(
        "Decoding {} against {}",
        args.input.display(),
        shape_path.display()
    ))?;

    let shape = load_shape(shape_path, effective_policy(args.const_policy, config))?;
    let input = read_input(&args.input)?;
    output.debug(&format!("Read {} bytes of input", input.len()))?;

    let decoded = {
        let _timer = Timer::with_details("decode", &format!("shape: {}", shape.name()));
        match shape.decode(&input) {
            Ok(decoded) => decoded,
            Err(e) => {
                output.error("✗ Document does not match the shape")?;
                return Err(e.into());
            }
        }
    };
    info!(shape = shape.name(), "Document decoded");

    output.section("Decoded")?;
    output.decoded(&decoded)?;

    if output.is_verbose() {
        if let Some(routed) = decoded.as_routed() {
            output.section("Routing")?;
            output.table(&["Key", "Destination"], routing_rows(routed))?;
        }
    }

    output.success("✓ Document matches the shape")?;
    Ok(())
}

/// One `(key, destination)` row per routed entry, in destination order
fn routing_rows(routed: &Routed) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for key in routed.known.keys() {
        rows.push(vec![key.clone(), "known".to_string()]);
    }
    for key in routed.constants.keys() {
        rows.push(vec![key.clone(), "const".to_string()]);
    }
    for (name, bucket) in routed.buckets.iter() {
        for key in bucket.keys() {
            rows.push(vec![key.clone(), format!("bucket {}", name)]);
        }
    }
    for key in routed.additional.keys() {
        rows.push(vec![key.clone(), "additional".to_string()]);
    }
    rows
}

/// Count of routed entries, for logging from other handlers
pub(super) fn entry_count(decoded: &Decoded) -> usize {
    decoded.as_routed().map_or(0, |routed| routing_rows(routed).len())
}
