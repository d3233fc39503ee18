/// Events emitted while building or serving the release feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A page of starred repositories was received.
    ListingPage { page: u32, count: usize },
    /// Repository discovery finished.
    ListingComplete { total: usize },
    /// Release fetching is starting for `total` repositories.
    FetchStarted { total: usize },
    /// One repository finished (successfully or not).
    FetchProgress {
        completed: usize,
        total: usize,
        failed: usize,
    },
    /// A repository's releases could not be fetched and were skipped.
    RepoFailed { repo: String, error: String },
    /// All fetches finished; `failed` repositories were skipped.
    FetchComplete { succeeded: usize, failed: usize },
    /// A snapshot was aggregated.
    Aggregated { releases: usize },
    /// The cached snapshot was served.
    CacheHit { releases: usize },
    /// No usable cached snapshot was found.
    CacheMiss { reason: String },
    /// A fresh snapshot was written to the cache.
    CacheStored { releases: usize },
    /// Writing the cache failed; the fresh snapshot is still served.
    CacheStoreFailed { error: String },
}
