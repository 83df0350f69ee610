// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use history_harvester::config::StatePaths;
use history_harvester::harvest::{
    HarvestApi, HarvestSettings, Item, ItemClass, ItemFeed, ResolveOutcome, TimeWindow, UserHandle,
};
use history_harvester::Identity;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub fn post(ts: i64, sub: &str) -> Item {
    Item {
        class: ItemClass::Post,
        id: format!("t3_{ts}"),
        category_label: sub.to_string(),
        created_utc: ts,
        title: Some(format!("t{ts}")),
        body: format!("b{ts}"),
    }
}

pub fn comment(ts: i64, sub: &str, body: &str) -> Item {
    Item {
        class: ItemClass::Comment,
        id: format!("t1_{ts}"),
        category_label: sub.to_string(),
        created_utc: ts,
        title: None,
        body: body.to_string(),
    }
}

/// The block a post built by [`post`] renders to.
pub fn post_block(ts: i64, sub: &str) -> String {
    format!("Post:\n  subreddit: r/{sub}\n  title: t{ts}\n  body:\n    b{ts}\n\n")
}

pub fn state_paths(dir: &Path) -> StatePaths {
    StatePaths {
        processed: dir.join("visited_users.txt"),
        failed: dir.join("timeouts_users.txt"),
        excluded_categories: dir.join("visited_subs.txt"),
        discovered_categories: dir.join("new_subs.txt"),
    }
}

pub fn settings(out_dir: &Path) -> HarvestSettings {
    HarvestSettings {
        out_dir: out_dir.to_path_buf(),
        window: TimeWindow::default(),
        item_delay: Duration::ZERO,
        ..HarvestSettings::default()
    }
}

/// Feed entry: an item, or an error raised when it is reached.
pub type Entry = std::result::Result<Item, String>;

pub struct VecFeed {
    entries: VecDeque<Entry>,
}

#[async_trait::async_trait]
impl ItemFeed for VecFeed {
    async fn next_item(&mut self) -> Result<Option<Item>> {
        match self.entries.pop_front() {
            None => Ok(None),
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(msg)) => Err(anyhow!(msg)),
        }
    }
}

enum Resolution {
    Answer(ResolveOutcome),
    Transport(String),
}

/// Scripted remote: per-identity resolution answers and per-(user, class) feeds.
#[derive(Default)]
pub struct FakeApi {
    resolutions: HashMap<String, Resolution>,
    feeds: HashMap<(String, ItemClass), Vec<Entry>>,
    resolved: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account; its remote spelling is `name`, lookups use the canonical form.
    pub fn user(mut self, name: &str) -> Self {
        self.resolutions.insert(
            Identity::new(name).as_str().to_string(),
            Resolution::Answer(ResolveOutcome::Found(UserHandle {
                name: name.to_string(),
                id: Some(format!("id_{}", name.to_lowercase())),
            })),
        );
        self
    }

    pub fn answer(mut self, raw: &str, outcome: ResolveOutcome) -> Self {
        self.resolutions.insert(
            Identity::new(raw).as_str().to_string(),
            Resolution::Answer(outcome),
        );
        self
    }

    pub fn unreachable(mut self, raw: &str, msg: &str) -> Self {
        self.resolutions.insert(
            Identity::new(raw).as_str().to_string(),
            Resolution::Transport(msg.to_string()),
        );
        self
    }

    pub fn posts(mut self, name: &str, entries: Vec<Entry>) -> Self {
        self.feeds.insert((name.to_string(), ItemClass::Post), entries);
        self
    }

    pub fn comments(mut self, name: &str, entries: Vec<Entry>) -> Self {
        self.feeds
            .insert((name.to_string(), ItemClass::Comment), entries);
        self
    }

    /// Canonical identities resolved so far, in order.
    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HarvestApi for FakeApi {
    async fn resolve(&self, identity: &Identity) -> Result<ResolveOutcome> {
        self.resolved
            .lock()
            .unwrap()
            .push(identity.as_str().to_string());
        match self.resolutions.get(identity.as_str()) {
            Some(Resolution::Answer(o)) => Ok(o.clone()),
            Some(Resolution::Transport(msg)) => Err(anyhow!(msg.clone())),
            None => Ok(ResolveOutcome::NotFound),
        }
    }

    fn feed<'a>(&'a self, user: &UserHandle, class: ItemClass) -> Box<dyn ItemFeed + Send + 'a> {
        let entries = self
            .feeds
            .get(&(user.name.clone(), class))
            .cloned()
            .unwrap_or_default();
        Box::new(VecFeed {
            entries: entries.into(),
        })
    }
}
