// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod canon;
pub mod config;
pub mod error;
pub mod harvest;
pub mod lang;
pub mod metrics;
pub mod reddit;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::canon::{Category, Identity};
pub use crate::error::ConfigError;
pub use crate::harvest::{
    BatchReport, HarvestApi, HarvestSettings, HarvestState, Harvester, IdentityOutcome, Item,
    ItemClass, ItemFeed, ResolveOutcome, TimeWindow, UserHandle, WindowedPaginator,
};
pub use crate::lang::{ClassifierVerdict, LanguageClassifier, LanguageFilterSettings};
pub use crate::reddit::RedditClient;
pub use crate::store::{CategoryLedger, IdentityStore};
