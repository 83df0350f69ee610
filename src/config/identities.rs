// src/config/identities.rs
use crate::canon::Identity;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse an identity list: one per line, `#` and blank lines ignored, optional
/// `u/` prefix, only the first whitespace-separated token counts. Duplicates
/// (case-insensitive) are dropped, first occurrence wins.
pub fn parse_identity_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let key = Identity::new(token);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            let display = token
                .strip_prefix("u/")
                .or_else(|| token.strip_prefix("U/"))
                .unwrap_or(token);
            out.push(display.to_string());
        }
    }
    out
}

/// Load an identity list file. A file without any identity is a fatal configuration error.
pub fn load_identities_from_file(path: &Path) -> Result<Vec<String>> {
    let bytes =
        fs::read(path).with_context(|| format!("reading identity list {}", path.display()))?;
    let users = parse_identity_list(&String::from_utf8_lossy(&bytes));
    if users.is_empty() {
        return Err(ConfigError::NoIdentities(path.display().to_string()).into());
    }
    Ok(users)
}
