//! Cache-aside entry points used by the CLI and any other front end.

use std::sync::Arc;

use starfeed_core::{
    aggregate::aggregate,
    cache::SnapshotCache,
    error::FeedError,
    model::{Page, Snapshot},
    paginate::paginate,
    FeedResult,
};
use starfeed_db::KeyValueStore;
use starfeed_events::FeedEvent;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{fetcher::fetch_all, lister::list_all, FeedContext};

/// Where a served snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Live,
}

/// A snapshot ready to serve.
///
/// `store_error` is set when a freshly built snapshot could not be written
/// to the cache. The snapshot itself is still valid.
#[derive(Debug)]
pub struct Outcome {
    pub snapshot: Snapshot,
    pub origin: Origin,
    pub store_error: Option<FeedError>,
}

impl Outcome {
    fn cached(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            origin: Origin::Cache,
            store_error: None,
        }
    }
}

pub struct FeedService<S> {
    ctx: FeedContext,
    cache: Arc<SnapshotCache<S>>,
    // Held while the pipeline runs so concurrent misses share one run.
    flight: Mutex<()>,
}

impl<S: KeyValueStore + 'static> FeedService<S> {
    pub fn new(ctx: FeedContext, store: S) -> Self {
        let cache = Arc::new(SnapshotCache::new(store, ctx.config().cache_key()));
        Self {
            ctx,
            cache,
            flight: Mutex::new(()),
        }
    }

    pub fn context(&self) -> &FeedContext {
        &self.ctx
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        self.cache.as_ref()
    }

    /// Serves the cached snapshot, building and storing one on a miss.
    ///
    /// Any load failure counts as a miss. Callers that miss together wait
    /// for a single pipeline run and then read its stored result.
    pub async fn get_or_load(&self, cancel: &CancellationToken) -> FeedResult<Outcome> {
        match self.load_cached().await {
            Ok(snapshot) => return Ok(self.hit(snapshot)),
            Err(err) => self.miss(&err),
        }

        let _guard = self.flight.lock().await;
        // A run that finished while this caller waited has stored its result.
        if let Ok(snapshot) = self.load_cached().await {
            return Ok(self.hit(snapshot));
        }

        self.run_pipeline(cancel).await
    }

    /// Rebuilds the snapshot from upstream and replaces the cached one.
    pub async fn refresh(&self, cancel: &CancellationToken) -> FeedResult<Outcome> {
        let _guard = self.flight.lock().await;
        self.run_pipeline(cancel).await
    }

    /// Returns page `page` of `snapshot`; see [`paginate`].
    pub fn page<'a>(&self, snapshot: &'a Snapshot, page: i64, page_size: usize) -> Page<'a> {
        paginate(snapshot, page, page_size)
    }

    async fn load_cached(&self) -> FeedResult<Snapshot> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.load())
            .await
            .map_err(|err| FeedError::Join(err.to_string()))?
    }

    fn hit(&self, snapshot: Snapshot) -> Outcome {
        debug!(releases = snapshot.len(), "serving cached snapshot");
        self.ctx.events().emit(FeedEvent::CacheHit {
            releases: snapshot.len(),
        });
        Outcome::cached(snapshot)
    }

    fn miss(&self, err: &FeedError) {
        if !err.is_not_found() {
            warn!("ignoring unusable cached snapshot: {err}");
        }
        self.ctx.events().emit(FeedEvent::CacheMiss {
            reason: err.to_string(),
        });
    }

    async fn run_pipeline(&self, cancel: &CancellationToken) -> FeedResult<Outcome> {
        let repos = list_all(&self.ctx, cancel).await?;
        let batches = fetch_all(&self.ctx, repos, cancel).await?;

        let snapshot = aggregate(batches);
        self.ctx.events().emit(FeedEvent::Aggregated {
            releases: snapshot.len(),
        });

        if cancel.is_cancelled() {
            return Err(FeedError::Cancelled);
        }

        let cache = self.cache.clone();
        let (snapshot, stored) = tokio::task::spawn_blocking(move || {
            let stored = cache.store(&snapshot);
            (snapshot, stored)
        })
        .await
        .map_err(|err| FeedError::Join(err.to_string()))?;

        let store_error = match stored {
            Ok(()) => {
                debug!(releases = snapshot.len(), key = self.cache.key(), "cached fresh snapshot");
                self.ctx.events().emit(FeedEvent::CacheStored {
                    releases: snapshot.len(),
                });
                None
            }
            Err(err) => {
                warn!("failed to cache snapshot: {err}");
                self.ctx.events().emit(FeedEvent::CacheStoreFailed {
                    error: err.to_string(),
                });
                Some(err)
            }
        };

        Ok(Outcome {
            snapshot,
            origin: Origin::Live,
            store_error,
        })
    }
}
