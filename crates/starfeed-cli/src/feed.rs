use chrono::Utc;
use nu_ansi_term::Color::{Cyan, DarkGray, Green, Yellow};
use starfeed_core::{model::Page, FeedResult};
use starfeed_db::KeyValueStore;
use starfeed_operations::{CancellationToken, FeedService, Origin, Outcome};
use tracing::{info, warn};

use crate::utils::Colored;

/// Serves the feed (from cache when possible) and prints one page of it.
pub async fn show_feed<S: KeyValueStore + 'static>(
    service: &FeedService<S>,
    cancel: &CancellationToken,
    page: i64,
    per_page: Option<usize>,
) -> FeedResult<()> {
    let outcome = service.get_or_load(cancel).await?;
    print_outcome(service, &outcome, page, per_page);
    Ok(())
}

/// Rebuilds the feed from upstream and prints its first page.
pub async fn refresh_feed<S: KeyValueStore + 'static>(
    service: &FeedService<S>,
    cancel: &CancellationToken,
    per_page: Option<usize>,
) -> FeedResult<()> {
    let outcome = service.refresh(cancel).await?;
    print_outcome(service, &outcome, 1, per_page);
    Ok(())
}

fn print_outcome<S: KeyValueStore + 'static>(
    service: &FeedService<S>,
    outcome: &Outcome,
    page: i64,
    per_page: Option<usize>,
) {
    if let Some(err) = &outcome.store_error {
        warn!("Feed could not be cached and will be rebuilt next time: {err}");
    }

    let per_page = per_page.unwrap_or_else(|| service.context().config().per_page());
    let page = service.page(&outcome.snapshot, page, per_page);
    print_page(&page);

    let origin = match outcome.origin {
        Origin::Cache => "cached",
        Origin::Live => "fresh",
    };
    info!(
        "{}",
        Colored(
            DarkGray,
            format!("{} releases in feed ({origin})", outcome.snapshot.len())
        )
    );
}

fn print_page(page: &Page<'_>) {
    if page.releases.is_empty() {
        info!("No releases found in your starred repositories.");
        return;
    }

    for (release, age) in page.labelled(Utc::now()) {
        let title = if release.release_name.is_empty() || release.release_name == release.tag_name {
            String::new()
        } else {
            format!(" {}", release.release_name)
        };
        info!(
            "{} {}{} {}",
            Colored(Cyan, &release.repo_name),
            Colored(Green, &release.tag_name),
            title,
            Colored(DarkGray, format!("({age})"))
        );
        info!("  {}", release.url);
    }

    let mut nav = format!("Page {}/{}", page.current_page, page.total_pages);
    if page.has_prev() {
        nav.push_str(&format!("  prev: --page {}", page.prev_page));
    }
    if page.has_next() {
        nav.push_str(&format!("  next: --page {}", page.next_page));
    }
    info!("{}", Colored(Yellow, nav));
}
