//! Observable gallery state
//!
//! Wraps a [`GalleryLoader`] and publishes each completed load to subscribers, together with
//! whether a load is still running.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gallery_storage::Favorites;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::loader::{GalleryLoader, ImageRecord};

/// What the UI layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GallerySnapshot {
    /// Whether a load is in flight
    pub loading: bool,
    /// Images from the most recently completed load, newest first
    pub images: Vec<ImageRecord>,
}

/// Gallery state shared with the UI layer
///
/// Refreshes are not coalesced. When loads overlap, the last one to complete supplies the
/// images, and `loading` stays set until every load has completed.
pub struct Gallery {
    loader: GalleryLoader,
    favorites: Arc<Favorites>,
    state: watch::Sender<GallerySnapshot>,
    in_flight: AtomicUsize,
}

impl Gallery {
    /// Creates a gallery with no images loaded
    #[must_use]
    pub fn new(loader: GalleryLoader, favorites: Arc<Favorites>) -> Self {
        let (state, _) = watch::channel(GallerySnapshot::default());
        Self {
            loader,
            favorites,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Subscribes to snapshot updates
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GallerySnapshot> {
        self.state.subscribe()
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> GallerySnapshot {
        self.state.borrow().clone()
    }

    /// Reloads the gallery and returns the number of images now shown
    pub async fn refresh(&self) -> usize {
        let load = InFlightLoad::start(&self.in_flight, &self.state);

        let images = self.loader.load_all().await;
        let count = images.len();
        load.finish(images);

        debug!("Gallery refreshed with {count} images");
        count
    }

    /// The signed URL of image `id` as currently shown, for sharing
    #[must_use]
    pub fn share_link(&self, id: &str) -> Option<String> {
        self.state
            .borrow()
            .images
            .iter()
            .find(|image| image.id == id)
            .map(|image| image.url.clone())
    }

    /// Whether image `id` is a favorite
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Flips the favorite flag of image `id` and returns the new value
    pub fn toggle_favorite(&self, id: &str) -> bool {
        self.favorites.toggle(id)
    }
}

/// Tracks one running refresh. Dropping it without [`Self::finish`] (the refresh future was
/// cancelled) still releases its slot, so `loading` cannot stay set forever.
struct InFlightLoad<'a> {
    in_flight: &'a AtomicUsize,
    state: &'a watch::Sender<GallerySnapshot>,
    finished: bool,
}

impl<'a> InFlightLoad<'a> {
    fn start(in_flight: &'a AtomicUsize, state: &'a watch::Sender<GallerySnapshot>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        state.send_modify(|snapshot| snapshot.loading = true);
        Self {
            in_flight,
            state,
            finished: false,
        }
    }

    fn finish(mut self, images: Vec<ImageRecord>) {
        self.finished = true;
        let still_loading = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        self.state.send_replace(GallerySnapshot {
            loading: still_loading,
            images,
        });
    }
}

impl Drop for InFlightLoad<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        debug!("Gallery refresh cancelled before completion");
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.send_modify(|snapshot| snapshot.loading = false);
        }
    }
}
