// src/metrics.rs
use metrics::{describe_counter, Unit};
use once_cell::sync::OnceCell;

pub const ITEMS_KEPT: &str = "harvest_items_kept_total";
pub const ITEMS_SKIPPED: &str = "harvest_items_skipped_total";
pub const IDENTITIES: &str = "harvest_identities_total";
pub const FEED_PAGES: &str = "harvest_feed_pages_total";

/// One-time metrics registration (so series carry descriptions once a recorder is installed).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(ITEMS_KEPT, Unit::Count, "Items written to an output file.");
        describe_counter!(
            ITEMS_SKIPPED,
            Unit::Count,
            "In-window items dropped, labelled by reason (excluded_category, language)."
        );
        describe_counter!(
            IDENTITIES,
            Unit::Count,
            "Identities handled, labelled by outcome."
        );
        describe_counter!(FEED_PAGES, Unit::Count, "Listing pages fetched from the remote.");
    });
}
