use std::{
    sync::{mpsc::Receiver, Arc, LazyLock},
    time::Duration,
};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use nu_ansi_term::Color::{Cyan, Red};
use starfeed_events::FeedEvent;

use crate::utils::Colored;

static MULTI: LazyLock<Arc<MultiProgress>> = LazyLock::new(|| Arc::new(MultiProgress::new()));

/// Pause progress display, run the closure, then resume.
pub fn suspend<F: FnOnce()>(f: F) {
    MULTI.suspend(f);
}

/// Stop and clear all progress bars.
pub fn stop() {
    MULTI.clear().ok();
}

/// Owns the thread rendering feed events.
///
/// Drop every event sender (the service and its context) before calling
/// [`finish`](ProgressGuard::finish), or it blocks forever.
pub struct ProgressGuard {
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ProgressGuard {
    pub fn finish(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn fetch_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}  {wide_bar:.cyan/dim}  {pos}/{len}")
        .map(|style| style.progress_chars("━━─"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

pub fn spawn_event_handler(receiver: Receiver<FeedEvent>) -> ProgressGuard {
    let handle = std::thread::spawn(move || {
        let mut listing: Option<ProgressBar> = None;
        let mut fetching: Option<ProgressBar> = None;

        while let Ok(event) = receiver.recv() {
            match event {
                FeedEvent::ListingPage { page, count } => {
                    let pb = listing.get_or_insert_with(|| {
                        let pb = MULTI.add(ProgressBar::new_spinner());
                        pb.set_style(spinner_style());
                        pb.enable_steady_tick(Duration::from_millis(100));
                        pb
                    });
                    pb.set_message(format!("Listing starred repositories (page {page}, {count} found)"));
                }
                FeedEvent::ListingComplete { .. } => {
                    if let Some(pb) = listing.take() {
                        pb.finish_and_clear();
                    }
                }
                FeedEvent::FetchStarted { total } => {
                    let pb = MULTI.add(ProgressBar::new(total as u64));
                    pb.set_style(fetch_style());
                    pb.set_message(format!("{}", Colored(Cyan, "Fetching releases")));
                    pb.enable_steady_tick(Duration::from_millis(100));
                    fetching = Some(pb);
                }
                FeedEvent::FetchProgress {
                    completed, failed, ..
                } => {
                    if let Some(pb) = &fetching {
                        pb.set_position(completed as u64);
                        if failed > 0 {
                            pb.set_message(format!(
                                "{} {}",
                                Colored(Cyan, "Fetching releases"),
                                Colored(Red, format!("({failed} failed)"))
                            ));
                        }
                    }
                }
                FeedEvent::FetchComplete { .. } => {
                    if let Some(pb) = fetching.take() {
                        pb.finish_and_clear();
                    }
                }
                FeedEvent::RepoFailed { .. }
                | FeedEvent::Aggregated { .. }
                | FeedEvent::CacheHit { .. }
                | FeedEvent::CacheMiss { .. }
                | FeedEvent::CacheStored { .. }
                | FeedEvent::CacheStoreFailed { .. } => {}
            }
        }

        for pb in [listing, fetching].into_iter().flatten() {
            pb.finish_and_clear();
        }
    });

    ProgressGuard {
        handle: Some(handle),
    }
}
