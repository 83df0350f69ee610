// src/store/lines.rs
//! Flat text stores: one entry per line, `#` comments and blank lines ignored.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Read entries from `path`, mapping each through `canon`.
/// A missing file is an empty set; invalid UTF-8 is replaced rather than rejected.
pub fn read_entries<T, F>(path: &Path, canon: F) -> Result<BTreeSet<T>>
where
    T: Ord,
    F: Fn(&str) -> T,
{
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("reading store {}", path.display()));
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(canon)
        .collect())
}

/// Append a single line, creating the file and its parent directory when needed.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening store {} for append", path.display()))?;
    writeln!(f, "{line}").with_context(|| format!("appending to {}", path.display()))?;
    Ok(())
}
