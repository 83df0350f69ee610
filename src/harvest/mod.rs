// src/harvest/mod.rs
pub mod orchestrator;
pub mod output;
pub mod types;
pub mod window;

pub use orchestrator::{
    BatchReport, HarvestCounts, HarvestSettings, HarvestState, Harvester, IdentityOutcome,
    ItemDecision, ItemSkip, SkipReason,
};
pub use types::{HarvestApi, Item, ItemClass, ItemFeed, ResolveOutcome, UserHandle};
pub use window::{PaginatorState, TimeWindow, WindowedPaginator};
