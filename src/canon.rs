// src/canon.rs
//! Canonical forms for identities (`u/Name`) and categories (`r/Name`).
//!
//! Both are case-insensitive labels with an optional namespace prefix. The
//! canonical form strips every leading prefix (so the function reaches a
//! fixpoint and stays idempotent) and lower-cases the rest.

use std::fmt;

/// Strip `/<ns>/` or `<ns>/` prefixes and surrounding whitespace until nothing changes.
fn canonical(raw: &str, ns: char) -> String {
    let mut cur = raw.trim();
    loop {
        let before = cur;
        cur = cur.strip_prefix('/').unwrap_or(cur).trim_start();
        let mut chars = cur.chars();
        if let (Some(c), Some('/')) = (chars.next(), chars.next()) {
            if c.eq_ignore_ascii_case(&ns) {
                cur = cur[2..].trim_start();
            }
        }
        if cur == before {
            break;
        }
    }
    cur.trim().to_lowercase()
}

/// A user handle in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: &str) -> Self {
        Self(canonical(raw, 'u'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Letters, digits, `_` and `-` only, so the name can be used as a file stem.
    pub fn is_file_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u/{}", self.0)
    }
}

/// A community label in canonical form. May be empty; empty categories are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    pub fn new(raw: &str) -> Self {
        Self(canonical(raw, 'r'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{}", self.0)
    }
}
