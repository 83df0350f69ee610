// src/config/mod.rs
pub mod credentials;
pub mod harvest;
pub mod identities;
pub mod time;

pub use credentials::RedditCredentials;
pub use harvest::{HarvestFileConfig, StatePaths};
pub use identities::{load_identities_from_file, parse_identity_list};
pub use time::{parse_optional_bound, parse_time_bound};
