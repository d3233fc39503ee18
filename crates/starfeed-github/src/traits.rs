use crate::{
    error::Result,
    models::{GithubRelease, StarredRepo},
};

/// The upstream service starfeed reads starred repositories and releases from.
///
/// Calls are blocking; async callers should run them on a blocking pool.
pub trait Upstream: Send + Sync {
    /// Returns one page of the authenticated user's starred repositories.
    ///
    /// Pages are 1-based. An empty vector means there are no more pages.
    fn list_starred(&self, credential: &str, page: u32, per_page: u32)
        -> Result<Vec<StarredRepo>>;

    /// Returns the releases of `owner/repo`, newest first as the API orders them.
    fn list_releases(&self, credential: &str, owner: &str, repo: &str)
        -> Result<Vec<GithubRelease>>;
}

impl<T: Upstream + ?Sized> Upstream for std::sync::Arc<T> {
    fn list_starred(
        &self,
        credential: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StarredRepo>> {
        (**self).list_starred(credential, page, per_page)
    }

    fn list_releases(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<GithubRelease>> {
        (**self).list_releases(credential, owner, repo)
    }
}
