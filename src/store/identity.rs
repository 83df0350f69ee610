// src/store/identity.rs
use crate::canon::Identity;
use crate::store::lines::{append_line, read_entries};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Persistent set of identities backed by an append-only text file.
///
/// The file is read once in [`IdentityStore::open`]; afterwards the in-memory
/// set is the source of truth for membership and every new entry is written
/// through immediately, so an interrupted run keeps what it already recorded.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    entries: BTreeSet<Identity>,
}

impl IdentityStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = read_entries(&path, Identity::new)?;
        // a line like "u/" canonicalizes to nothing
        let entries = entries.into_iter().filter(|i| !i.is_empty()).collect();
        Ok(Self { path, entries })
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.entries.contains(identity)
    }

    /// Record `identity`. Returns `true` if a new line was persisted.
    pub fn add(&mut self, identity: &Identity) -> Result<bool> {
        if identity.is_empty() || self.entries.contains(identity) {
            return Ok(false);
        }
        append_line(&self.path, identity.as_str())?;
        self.entries.insert(identity.clone());
        tracing::debug!(target: "store", path = %self.path.display(), %identity, "identity recorded");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn add_then_contains() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = IdentityStore::open(dir.path().join("visited.txt")).unwrap();
        assert!(s.is_empty());
        assert!(s.add(&Identity::new("u/Alice")).unwrap());
        assert!(s.contains(&Identity::new("ALICE")));
    }

    #[test]
    fn double_add_persists_once() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("visited.txt");
        let mut s = IdentityStore::open(&p).unwrap();
        assert!(s.add(&Identity::new("bob")).unwrap());
        assert!(!s.add(&Identity::new("u/BOB")).unwrap());
        assert_eq!(fs::read_to_string(&p).unwrap(), "bob\n");
    }

    #[test]
    fn reopen_sees_prior_entries_in_canonical_form() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("visited.txt");
        fs::write(&p, "# done\nu/Carol\n\nDave\n").unwrap();
        let mut s = IdentityStore::open(&p).unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.contains(&Identity::new("carol")));
        assert!(!s.add(&Identity::new("dave")).unwrap());
    }

    #[test]
    fn empty_identity_is_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("visited.txt");
        let mut s = IdentityStore::open(&p).unwrap();
        assert!(!s.add(&Identity::new("u/")).unwrap());
        assert!(!p.exists());
    }
}
