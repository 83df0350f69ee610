// src/harvest/orchestrator.rs
//! Per-identity harvest state machine and the sequential batch loop.
//!
//! queued → resolving → skipped(reason) | harvesting → completed | failed
//!
//! Completion (even with zero items) lands the identity in the processed
//! store; any error while resolving or harvesting lands it in the failed store
//! and the batch moves on. Resolution answers such as "not found" are neither.

use crate::canon::{Category, Identity};
use crate::config::StatePaths;
use crate::harvest::output::OutputSink;
use crate::harvest::types::{HarvestApi, Item, ItemClass, ResolveOutcome, UserHandle};
use crate::harvest::window::{TimeWindow, WindowedPaginator};
use crate::lang::{anon_hash, ClassifierVerdict, LanguageClassifier};
use crate::metrics::{ensure_metrics_described, IDENTITIES, ITEMS_KEPT, ITEMS_SKIPPED};
use crate::store::{CategoryLedger, IdentityStore};
use anyhow::Result;
use metrics::counter;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Language-skip lines logged per identity before going quiet.
const MAX_LANGUAGE_SKIP_LOGS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSettings {
    pub out_dir: PathBuf,
    pub window: TimeWindow,
    pub post_limit: Option<usize>,
    pub comment_limit: Option<usize>,
    pub include_posts: bool,
    pub include_comments: bool,
    /// Pause after every candidate item, kept or not.
    pub item_delay: Duration,
    /// Harvest identities even if the processed store already lists them.
    pub disregard_processed: bool,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("output"),
            window: TimeWindow::default(),
            post_limit: None,
            comment_limit: None,
            include_posts: true,
            include_comments: true,
            item_delay: Duration::from_millis(500),
            disregard_processed: false,
        }
    }
}

/// The persistent stores one run works against, loaded once up front.
#[derive(Debug)]
pub struct HarvestState {
    pub processed: IdentityStore,
    pub failed: IdentityStore,
    pub ledger: CategoryLedger,
}

impl HarvestState {
    pub fn open(paths: &StatePaths) -> Result<Self> {
        let state = Self {
            processed: IdentityStore::open(&paths.processed)?,
            failed: IdentityStore::open(&paths.failed)?,
            ledger: CategoryLedger::open(&paths.excluded_categories, &paths.discovered_categories)?,
        };
        info!(
            target: "store",
            processed = state.processed.len(),
            failed = state.failed.len(),
            excluded_categories = state.ledger.excluded_len(),
            discovered_categories = state.ledger.discovered_len(),
            "state loaded"
        );
        Ok(state)
    }
}

/// Why an identity was skipped without harvesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The name cannot be used as an output file stem; never sent to the remote.
    InvalidName,
    NotFound,
    Forbidden,
    Redirect,
    Unknown(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidName => f.write_str("invalid name"),
            SkipReason::NotFound => f.write_str("not found / deleted / suspended"),
            SkipReason::Forbidden => f.write_str("forbidden (cannot access)"),
            SkipReason::Redirect => f.write_str("redirected (invalid user)"),
            SkipReason::Unknown(e) => write!(f, "unknown error: {e}"),
        }
    }
}

/// Why a single item was not written.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSkip {
    ExcludedCategory(Category),
    Language(ClassifierVerdict),
}

impl ItemSkip {
    fn metric_label(&self) -> &'static str {
        match self {
            ItemSkip::ExcludedCategory(_) => "excluded_category",
            ItemSkip::Language(_) => "language",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemDecision {
    Keep,
    Skip(ItemSkip),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestCounts {
    pub posts: usize,
    pub comments: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityOutcome {
    /// Listed in the processed store and not re-run.
    AlreadyProcessed,
    Skipped(SkipReason),
    Completed(HarvestCounts),
    Failed(String),
}

impl IdentityOutcome {
    fn metric_label(&self) -> &'static str {
        match self {
            IdentityOutcome::AlreadyProcessed => "already_processed",
            IdentityOutcome::Skipped(_) => "skipped",
            IdentityOutcome::Completed(_) => "completed",
            IdentityOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(Identity, IdentityOutcome)>,
}

impl BatchReport {
    fn count(&self, f: impl Fn(&IdentityOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| f(o)).count()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, IdentityOutcome::Completed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, IdentityOutcome::Skipped(_)))
    }

    pub fn already_processed(&self) -> usize {
        self.count(|o| matches!(o, IdentityOutcome::AlreadyProcessed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, IdentityOutcome::Failed(_)))
    }

    pub fn outcome_of(&self, raw: &str) -> Option<&IdentityOutcome> {
        let key = Identity::new(raw);
        self.outcomes
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, o)| o)
    }
}

/// Log de-duplication for one identity.
#[derive(Default)]
struct IdentityLog {
    excluded_announced: HashSet<Category>,
    new_announced: HashSet<Category>,
    language_skips: usize,
}

impl IdentityLog {
    /// True the first time `category` is seen as excluded.
    fn announce_excluded(&mut self, category: &Category) -> bool {
        self.excluded_announced.insert(category.clone())
    }

    /// True for the first [`MAX_LANGUAGE_SKIP_LOGS`] language skips.
    fn admit_language_skip(&mut self) -> bool {
        if self.language_skips >= MAX_LANGUAGE_SKIP_LOGS {
            return false;
        }
        self.language_skips += 1;
        true
    }
}

pub struct Harvester<'a, A: HarvestApi + ?Sized> {
    api: &'a A,
    settings: HarvestSettings,
    classifier: Option<&'a LanguageClassifier>,
}

impl<'a, A: HarvestApi + ?Sized> Harvester<'a, A> {
    pub fn new(
        api: &'a A,
        settings: HarvestSettings,
        classifier: Option<&'a LanguageClassifier>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            api,
            settings,
            classifier,
        }
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Harvest every queued identity in order. Never aborts on a single identity.
    pub async fn run_batch(&self, identities: &[String], state: &mut HarvestState) -> BatchReport {
        let mut report = BatchReport::default();
        let total = identities.len();
        for (i, raw) in identities.iter().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let identity = Identity::new(raw);
            if identity.is_empty() {
                continue;
            }
            info!(target: "harvest", "=== [{}/{}] Queue: {} ===", i + 1, total, identity);
            let outcome = self.process_identity(&identity, state).await;
            report.outcomes.push((identity, outcome));
        }
        info!(
            target: "harvest",
            completed = report.completed(),
            skipped = report.skipped(),
            already_processed = report.already_processed(),
            failed = report.failed(),
            "batch finished"
        );
        report
    }

    /// Run one identity through the state machine and record the result in the stores.
    pub async fn process_identity(
        &self,
        identity: &Identity,
        state: &mut HarvestState,
    ) -> IdentityOutcome {
        // processed wins over failed; the failed store is only a retry list
        if !self.settings.disregard_processed && state.processed.contains(identity) {
            info!(target: "harvest", %identity, "already processed, skipping");
            counter!(IDENTITIES, "outcome" => "already_processed").increment(1);
            return IdentityOutcome::AlreadyProcessed;
        }

        let outcome = match self.resolve_and_harvest(identity, state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(target: "harvest", %identity, error = %format!("{e:#}"), "aborting identity due to failure");
                IdentityOutcome::Failed(format!("{e:#}"))
            }
        };

        match &outcome {
            IdentityOutcome::Completed(counts) => {
                if let Err(e) = state.processed.add(identity) {
                    error!(target: "store", %identity, error = ?e, "could not record processed identity");
                }
                info!(target: "harvest", %identity, posts = counts.posts, comments = counts.comments, "completed");
            }
            IdentityOutcome::Failed(_) => {
                if let Err(e) = state.failed.add(identity) {
                    error!(target: "store", %identity, error = ?e, "could not record failed identity");
                }
            }
            IdentityOutcome::Skipped(reason) => {
                info!(target: "harvest", %identity, %reason, "skipped");
            }
            IdentityOutcome::AlreadyProcessed => {}
        }
        counter!(IDENTITIES, "outcome" => outcome.metric_label()).increment(1);
        outcome
    }

    async fn resolve_and_harvest(
        &self,
        identity: &Identity,
        state: &mut HarvestState,
    ) -> Result<IdentityOutcome> {
        if !identity.is_file_safe() {
            return Ok(IdentityOutcome::Skipped(SkipReason::InvalidName));
        }
        info!(target: "harvest", %identity, "resolving");
        let user = match self.api.resolve(identity).await? {
            ResolveOutcome::Found(user) => user,
            ResolveOutcome::NotFound => return Ok(IdentityOutcome::Skipped(SkipReason::NotFound)),
            ResolveOutcome::Forbidden => {
                return Ok(IdentityOutcome::Skipped(SkipReason::Forbidden))
            }
            ResolveOutcome::Redirect => return Ok(IdentityOutcome::Skipped(SkipReason::Redirect)),
            ResolveOutcome::Other(e) => {
                return Ok(IdentityOutcome::Skipped(SkipReason::Unknown(e)))
            }
        };
        let counts = self.harvest_resolved(identity, &user, state).await?;
        Ok(IdentityOutcome::Completed(counts))
    }

    /// Open the sinks, run each enabled class, and close the sinks whatever happened.
    async fn harvest_resolved(
        &self,
        identity: &Identity,
        user: &UserHandle,
        state: &mut HarvestState,
    ) -> Result<HarvestCounts> {
        let out_dir = &self.settings.out_dir;
        let mut posts = if self.settings.include_posts {
            Some(OutputSink::create(out_dir, identity, ItemClass::Post)?)
        } else {
            None
        };
        let mut comments = if self.settings.include_comments {
            match OutputSink::create(out_dir, identity, ItemClass::Comment) {
                Ok(s) => Some(s),
                Err(e) => {
                    if let Some(p) = posts.take() {
                        if let Err(close) = p.finish() {
                            warn!(target: "harvest", %identity, error = %format!("{close:#}"), "could not close posts output");
                        }
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        let mut log = IdentityLog::default();
        let result = async {
            let mut counts = HarvestCounts::default();
            if let Some(sink) = posts.as_mut() {
                counts.posts = self
                    .harvest_class(identity, user, ItemClass::Post, sink, state, &mut log)
                    .await?;
            }
            if let Some(sink) = comments.as_mut() {
                counts.comments = self
                    .harvest_class(identity, user, ItemClass::Comment, sink, state, &mut log)
                    .await?;
            }
            Ok::<_, anyhow::Error>(counts)
        }
        .await;

        let mut close_err = None;
        for sink in [posts, comments].into_iter().flatten() {
            if let Err(e) = sink.finish() {
                close_err.get_or_insert(e);
            }
        }
        let counts = result?;
        match close_err {
            Some(e) => Err(e),
            None => Ok(counts),
        }
    }

    async fn harvest_class(
        &self,
        identity: &Identity,
        user: &UserHandle,
        class: ItemClass,
        sink: &mut OutputSink,
        state: &mut HarvestState,
        log: &mut IdentityLog,
    ) -> Result<usize> {
        let limit = match class {
            ItemClass::Post => self.settings.post_limit,
            ItemClass::Comment => self.settings.comment_limit,
        };
        info!(target: "harvest", %identity, %class, "downloading");

        let mut pager =
            WindowedPaginator::new(self.api.feed(user, class), self.settings.window, limit);
        while let Some(item) = pager.next().await? {
            match self.evaluate(&item, &state.ledger) {
                ItemDecision::Keep => {
                    let category = item.category();
                    if !category.is_empty() && log.new_announced.insert(category.clone()) {
                        debug!(target: "harvest", %category, "new category");
                        if state.ledger.record_discovery(&category)? {
                            info!(target: "harvest", %category, "new category recorded");
                        }
                    }
                    sink.write_item(&item)?;
                    counter!(ITEMS_KEPT).increment(1);
                }
                ItemDecision::Skip(skip) => {
                    counter!(ITEMS_SKIPPED, "reason" => skip.metric_label()).increment(1);
                    self.log_skip(&item, &skip, log);
                }
            }
            self.pause().await;
        }

        info!(
            target: "harvest",
            %identity,
            %class,
            saved = sink.written(),
            stop = ?pager.state(),
            path = %sink.path().display(),
            "finished"
        );
        Ok(sink.written())
    }

    /// Exclusion first, then the language filter (if one is configured).
    pub fn evaluate(&self, item: &Item, ledger: &CategoryLedger) -> ItemDecision {
        let category = item.category();
        if ledger.is_excluded(&category) {
            return ItemDecision::Skip(ItemSkip::ExcludedCategory(category));
        }
        if let Some(clf) = self.classifier {
            let verdict = clf.classify(&item.classifier_text());
            if !verdict.keep {
                return ItemDecision::Skip(ItemSkip::Language(verdict));
            }
        }
        ItemDecision::Keep
    }

    fn log_skip(&self, item: &Item, skip: &ItemSkip, log: &mut IdentityLog) {
        match skip {
            ItemSkip::ExcludedCategory(category) => {
                if log.announce_excluded(category) {
                    info!(target: "harvest", %category, class = %item.class, "category excluded, skipped");
                }
            }
            ItemSkip::Language(verdict) => {
                if log.admit_language_skip() {
                    let id = anon_hash(&item.classifier_text());
                    info!(
                        target: "lang",
                        %id,
                        category = %item.category(),
                        class = %item.class,
                        scores = %verdict,
                        "below language threshold, skipped"
                    );
                }
            }
        }
    }

    async fn pause(&self) {
        if !self.settings.item_delay.is_zero() {
            tokio::time::sleep(self.settings.item_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_category_is_announced_once() {
        let mut log = IdentityLog::default();
        let funny = Category::new("r/Funny");
        assert!(log.announce_excluded(&funny));
        assert!(!log.announce_excluded(&Category::new("funny")));
        assert!(log.announce_excluded(&Category::new("pics")));
    }

    #[test]
    fn language_skip_logs_are_capped_per_identity() {
        let mut log = IdentityLog::default();
        let admitted = (0..8).filter(|_| log.admit_language_skip()).count();
        assert_eq!(admitted, MAX_LANGUAGE_SKIP_LOGS);

        // a fresh identity starts over
        assert!(IdentityLog::default().admit_language_skip());
    }
}
