// src/reddit/mod.rs
//! Reddit implementation of the harvest collaborators: identity resolution via
//! `/user/{name}/about`, newest-first feeds via the `submitted` / `comments` listings.

pub mod client;
pub mod listing;

pub use client::{RedditClient, RedditFeed};
pub use listing::ListingPage;
