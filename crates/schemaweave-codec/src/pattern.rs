//! Process-wide registry of compiled key patterns
//!
//! Pattern rules are compiled once per distinct pattern string and shared by
//! every spec that declares them. After a pattern has been compiled the
//! registry only serves reads.
//!
//! Copyright (c) 2025 Schemaweave Team
//! Licensed under the Apache-2.0 license

use crate::error::{SpecError, SpecResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

static REGISTRY: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Regex>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get the compiled form of `pattern`, compiling it on first use
pub fn compile(pattern: &str) -> SpecResult<Regex> {
    if let Some(regex) = registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(pattern).map_err(|source| SpecError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut table = registry().write().unwrap_or_else(PoisonError::into_inner);
    let entry = table
        .entry(pattern.to_string())
        .or_insert_with(|| regex.clone());
    tracing::trace!(pattern, "compiled key pattern");
    Ok(entry.clone())
}

/// Number of distinct patterns compiled so far
pub fn compiled_count() -> usize {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}
