use starfeed_core::{error::FeedError, model::RepositoryRef, FeedResult};
use starfeed_events::FeedEvent;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::FeedContext;

/// Lists every starred repository, one page at a time.
///
/// Starts at page 1 and stops at the first empty page. Any failing page
/// fails the whole listing; a partial set is never returned.
pub async fn list_all(
    ctx: &FeedContext,
    cancel: &CancellationToken,
) -> FeedResult<Vec<RepositoryRef>> {
    let per_page = ctx.config().page_size();
    let mut repos = Vec::new();
    let mut page: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            return Err(FeedError::Cancelled);
        }

        let upstream = ctx.upstream().clone();
        let credential = ctx.credential().to_string();
        trace!(page, per_page, "requesting starred page");

        let batch = tokio::task::spawn_blocking(move || {
            upstream.list_starred(&credential, page, per_page)
        })
        .await
        .map_err(|err| FeedError::Join(err.to_string()))??;

        if batch.is_empty() {
            break;
        }

        debug!(page, count = batch.len(), "received starred page");
        ctx.events().emit(FeedEvent::ListingPage {
            page,
            count: batch.len(),
        });
        repos.extend(batch.into_iter().map(RepositoryRef::from));

        page = page
            .checked_add(1)
            .ok_or_else(|| FeedError::Custom("starred listing has too many pages".into()))?;
    }

    debug!(total = repos.len(), "listed starred repositories");
    ctx.events().emit(FeedEvent::ListingComplete { total: repos.len() });
    Ok(repos)
}
