// src/harvest/types.rs
use crate::canon::{Category, Identity};
use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemClass {
    Post,
    Comment,
}

impl ItemClass {
    pub fn label(self) -> &'static str {
        match self {
            ItemClass::Post => "posts",
            ItemClass::Comment => "comments",
        }
    }
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One harvested post or comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub class: ItemClass,
    /// Remote fullname, e.g. `t3_abc123`.
    pub id: String,
    /// Community label as the remote displays it (case preserved).
    pub category_label: String,
    /// Unix seconds.
    pub created_utc: i64,
    /// Posts only.
    pub title: Option<String>,
    pub body: String,
}

impl Item {
    pub fn category(&self) -> Category {
        Category::new(&self.category_label)
    }

    /// Text handed to the language filter.
    pub fn classifier_text(&self) -> String {
        match (&self.class, &self.title) {
            (ItemClass::Post, Some(title)) => format!("{}\n{}", title, self.body).trim().to_string(),
            _ => self.body.trim().to_string(),
        }
    }
}

/// A resolved, accessible account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHandle {
    /// Name as the remote spells it.
    pub name: String,
    pub id: Option<String>,
}

/// What the remote said about an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Found(UserHandle),
    /// Deleted, suspended-and-hidden, or never existed.
    NotFound,
    Forbidden,
    /// Remote redirected instead of answering: the name is not a valid account.
    Redirect,
    Other(String),
}

/// Newest-first item stream. Ordering is the remote's contract, not ours.
#[async_trait::async_trait]
pub trait ItemFeed: Send {
    async fn next_item(&mut self) -> Result<Option<Item>>;
}

/// The remote service as the harvester sees it.
#[async_trait::async_trait]
pub trait HarvestApi: Send + Sync {
    /// `Err` means the question could not be asked (transport, auth) and counts as a failure.
    async fn resolve(&self, identity: &Identity) -> Result<ResolveOutcome>;

    fn feed<'a>(&'a self, user: &UserHandle, class: ItemClass) -> Box<dyn ItemFeed + Send + 'a>;
}
