//! Client-side storage for the PixelLens gallery
//!
//! This crate provides the durable local key-value store together with the state persisted in it:
//! the signed URL cache (and its periodic expiration sweep) and the favorites set.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

pub mod favorites;
pub mod local_store;
pub mod signed_url_cache;

pub use favorites::Favorites;
pub use local_store::{FileStore, LocalStore, MemoryStore, StorageError, StorageResult};
pub use signed_url_cache::{CacheEntry, ExpirationSweep, SignedUrlCache, EXPIRATION_WINDOW};

/// Current wall-clock time as Unix epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
