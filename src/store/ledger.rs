// src/store/ledger.rs
//! Category ledger: the operator's exclusion list plus the log of categories
//! discovered while harvesting.

use crate::canon::Category;
use crate::store::lines::{append_line, read_entries};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Read the operator-maintained exclusion list. Missing file = nothing excluded.
pub fn load_excluded(path: &Path) -> Result<BTreeSet<Category>> {
    load_categories(path)
}

/// Read categories announced by earlier runs.
pub fn load_discovered(path: &Path) -> Result<BTreeSet<Category>> {
    load_categories(path)
}

fn load_categories(path: &Path) -> Result<BTreeSet<Category>> {
    let mut set = read_entries(path, Category::new)?;
    set.retain(|c| !c.is_empty());
    Ok(set)
}

#[derive(Debug)]
pub struct CategoryLedger {
    excluded: BTreeSet<Category>,
    discovered_path: PathBuf,
    /// Seeded from disk, so a category logged by a prior run is never appended again.
    seen: BTreeSet<Category>,
}

impl CategoryLedger {
    pub fn open(excluded_path: &Path, discovered_path: impl Into<PathBuf>) -> Result<Self> {
        let discovered_path = discovered_path.into();
        let excluded = load_excluded(excluded_path)?;
        let seen = load_discovered(&discovered_path)?;
        Ok(Self {
            excluded,
            discovered_path,
            seen,
        })
    }

    /// In-memory ledger with no discovery log on disk yet. Used by tests and dry setups.
    pub fn with_excluded<I>(excluded: I, discovered_path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        Self {
            excluded: excluded.into_iter().filter(|c| !c.is_empty()).collect(),
            discovered_path: discovered_path.into(),
            seen: BTreeSet::new(),
        }
    }

    pub fn is_excluded(&self, category: &Category) -> bool {
        self.excluded.contains(category)
    }

    /// Append `category` to the discovery log unless it is empty or already known.
    /// Returns `true` when a line was written.
    pub fn record_discovery(&mut self, category: &Category) -> Result<bool> {
        if category.is_empty() || self.seen.contains(category) {
            return Ok(false);
        }
        append_line(&self.discovered_path, category.as_str())?;
        self.seen.insert(category.clone());
        Ok(true)
    }

    pub fn excluded_len(&self) -> usize {
        self.excluded.len()
    }

    pub fn discovered_len(&self) -> usize {
        self.seen.len()
    }
}
