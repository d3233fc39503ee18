use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use starfeed_core::{
    error::FeedError,
    model::{ReleaseRecord, RepositoryRef},
    FeedResult,
};
use starfeed_events::FeedEvent;
use starfeed_github::Upstream;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::FeedContext;

/// Fetches the newest `cap` published releases of one repository.
///
/// Upstream order is kept; drafts without a publish time are dropped before
/// the cap applies.
pub fn fetch_capped(
    upstream: &dyn Upstream,
    credential: &str,
    repo: &RepositoryRef,
    cap: usize,
) -> FeedResult<Vec<ReleaseRecord>> {
    let releases = upstream.list_releases(credential, &repo.owner_login, &repo.name)?;
    Ok(releases
        .into_iter()
        .filter_map(|release| ReleaseRecord::from_release(repo, release))
        .take(cap)
        .collect())
}

/// Fetches releases for every repository, at most `concurrency` at a time.
///
/// Each repository gets its own task, which waits for a semaphore permit
/// before calling upstream. A repository that fails is logged, reported
/// as [`FeedEvent::RepoFailed`] and left out. Returns once every task has
/// finished, with one batch per successful repository in input order.
pub async fn fetch_all(
    ctx: &FeedContext,
    repos: Vec<RepositoryRef>,
    cancel: &CancellationToken,
) -> FeedResult<Vec<Vec<ReleaseRecord>>> {
    let total = repos.len();
    let cap = ctx.config().per_repo_cap();
    let semaphore = Arc::new(Semaphore::new(ctx.config().concurrency()));
    let completed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    debug!(total, cap, concurrency = ctx.config().concurrency(), "fetching releases");
    ctx.events().emit(FeedEvent::FetchStarted { total });

    let mut handles = Vec::with_capacity(total);

    for repo in repos {
        let ctx = ctx.clone();
        let semaphore = semaphore.clone();
        let cancel = cancel.clone();
        let completed = completed.clone();
        let failed = failed.clone();
        let name = repo.full_name();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let result = fetch_one(&ctx, semaphore, &cancel, repo, cap).await;

            let records = match result {
                Ok(records) => {
                    trace!(repo = %name, count = records.len(), "fetched releases");
                    Some(records)
                }
                Err(FeedError::Cancelled) => None,
                Err(err) => {
                    warn!(repo = %name, "skipping repository: {err}");
                    ctx.events().emit(FeedEvent::RepoFailed {
                        repo: name,
                        error: err.to_string(),
                    });
                    failed.fetch_add(1, Ordering::Relaxed);
                    None
                }
            };

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            ctx.events().emit(FeedEvent::FetchProgress {
                completed: done,
                total,
                failed: failed.load(Ordering::Relaxed),
            });

            records
        });
        handles.push((task_name, handle));
    }

    let mut batches = Vec::with_capacity(handles.len());
    for (name, handle) in handles {
        match handle.await {
            Ok(Some(records)) => batches.push(records),
            Ok(None) => {}
            Err(err) => {
                warn!(repo = %name, "release fetch task failed: {err}");
                ctx.events().emit(FeedEvent::RepoFailed {
                    repo: name,
                    error: err.to_string(),
                });
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    if cancel.is_cancelled() {
        return Err(FeedError::Cancelled);
    }

    let failed = failed.load(Ordering::Relaxed);
    debug!(succeeded = batches.len(), failed, "finished fetching releases");
    ctx.events().emit(FeedEvent::FetchComplete {
        succeeded: batches.len(),
        failed,
    });

    Ok(batches)
}

async fn fetch_one(
    ctx: &FeedContext,
    semaphore: Arc<Semaphore>,
    cancel: &CancellationToken,
    repo: RepositoryRef,
    cap: usize,
) -> FeedResult<Vec<ReleaseRecord>> {
    let _permit = tokio::select! {
        permit = semaphore.acquire_owned() => {
            permit.map_err(|_| FeedError::Custom("release fetch gate closed".into()))?
        }
        _ = cancel.cancelled() => return Err(FeedError::Cancelled),
    };

    if cancel.is_cancelled() {
        return Err(FeedError::Cancelled);
    }

    let upstream = ctx.upstream().clone();
    let credential = ctx.credential().to_string();
    tokio::task::spawn_blocking(move || fetch_capped(upstream.as_ref(), &credential, &repo, cap))
        .await
        .map_err(|err| FeedError::Join(err.to_string()))?
}
