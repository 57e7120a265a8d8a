//! Shared utilities for command handlers

use crate::cli::ConstPolicyArg;
use crate::config::{is_yaml, Config};
use crate::error::{Error, Result};
use schemaweave_codec::{ConstPolicy, Shape};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read an input document. `-` reads stdin.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }

    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read(path)?)
}

/// The shape file named on the command line, else the configured default
pub fn resolve_shape_path<'a>(arg: Option<&'a Path>, config: &'a Config) -> Result<&'a Path> {
    arg.or(config.codec.default_shape.as_deref())
        .ok_or(Error::MissingShape)
}

/// Const policy forced onto the shape: the flag wins over the config
pub fn effective_policy(arg: Option<ConstPolicyArg>, config: &Config) -> Option<ConstPolicy> {
    arg.map(ConstPolicy::from).or(config.codec.const_policy)
}

/// Load a shape declaration, applying a const policy override if given
pub fn load_shape(path: &Path, policy: Option<ConstPolicy>) -> Result<Shape> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    let mut shape = match path.extension().and_then(|s| s.to_str()) {
        _ if is_yaml(path) => Shape::from_yaml_str(&content)?,
        Some("json") | None => Shape::from_json_str(&content)?,
        Some(_) => {
            return Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON or YAML".to_string(),
            })
        }
    };

    if let Some(policy) = policy {
        debug!(?policy, "Overriding const policy");
        shape.set_const_policy(policy);
    }

    Ok(shape)
}
