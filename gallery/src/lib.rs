//! PixelLens gallery core
//!
//! Lists a bucket, resolves every object to a signed URL (through the persistent cache when it
//! is still fresh) and publishes the newest-first list of images for a UI layer.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Observable gallery state
pub mod gallery;

/// Bucket listing and URL signing
pub mod loader;

/// Object storage operations
pub mod object_store;

/// Configuration types
pub mod types;

pub use gallery::{Gallery, GallerySnapshot};
pub use loader::{GalleryLoader, ImageRecord, SIGNED_URL_EXPIRY};
