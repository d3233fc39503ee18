#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use chrono::{DateTime, TimeZone, Utc};
use starfeed_config::config::Config;
use starfeed_events::{CollectorSink, EventSinkHandle};
use starfeed_github::{
    error::Result,
    models::{GithubRelease, Owner, StarredRepo},
    Upstream, UpstreamError,
};
use starfeed_operations::FeedContext;

#[derive(Clone, Copy, Debug)]
pub enum Failure {
    Timeout,
    Api(u16, &'static str),
    Malformed,
}

impl Failure {
    fn into_error(self) -> UpstreamError {
        match self {
            Self::Timeout => {
                let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
                ureq::Error::Io(io).into()
            }
            Self::Api(status, message) => {
                UpstreamError::Api {
                    status,
                    message: message.to_string(),
                }
            }
            Self::Malformed => {
                UpstreamError::Decode {
                    url: "fake://releases".into(),
                    source: serde_json::from_str::<Vec<u8>>("<html>").unwrap_err(),
                }
            }
        }
    }
}

enum Releases {
    Ok(Vec<GithubRelease>),
    Fail(Failure),
}

/// Scripted upstream that records how it was called.
#[derive(Default)]
pub struct FakeUpstream {
    starred: Vec<StarredRepo>,
    releases: HashMap<String, Releases>,
    failing_pages: HashMap<u32, Failure>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    starred_calls: AtomicUsize,
    release_calls: AtomicUsize,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, owner: &str, name: &str, releases: Vec<GithubRelease>) -> Self {
        self.starred.push(starred(owner, name));
        self.releases
            .insert(format!("{owner}/{name}"), Releases::Ok(releases));
        self
    }

    pub fn failing_repo(mut self, owner: &str, name: &str, failure: Failure) -> Self {
        self.starred.push(starred(owner, name));
        self.releases
            .insert(format!("{owner}/{name}"), Releases::Fail(failure));
        self
    }

    pub fn failing_page(mut self, page: u32, failure: Failure) -> Self {
        self.failing_pages.insert(page, failure);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn starred_calls(&self) -> usize {
        self.starred_calls.load(Ordering::SeqCst)
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }
}

impl Upstream for FakeUpstream {
    fn list_starred(&self, _credential: &str, page: u32, per_page: u32) -> Result<Vec<StarredRepo>> {
        self.starred_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failing_pages.get(&page) {
            return Err(failure.into_error());
        }

        let per_page = per_page as usize;
        let start = (page.max(1) as usize - 1) * per_page;
        Ok(self
            .starred
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }

    fn list_releases(&self, _credential: &str, owner: &str, repo: &str) -> Result<Vec<GithubRelease>> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let result = match self.releases.get(&format!("{owner}/{repo}")) {
            Some(Releases::Ok(releases)) => Ok(releases.clone()),
            Some(Releases::Fail(failure)) => Err(failure.into_error()),
            None => {
                Err(UpstreamError::Api {
                    status: 404,
                    message: "Not Found".into(),
                })
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn starred(owner: &str, name: &str) -> StarredRepo {
    StarredRepo {
        name: name.into(),
        owner: Owner {
            login: owner.into(),
            avatar_url: format!("https://avatars.example/{owner}.png"),
        },
    }
}

/// A published release `hours_ago` hours before [`base_time`].
pub fn release(tag: &str, hours_ago: i64) -> GithubRelease {
    GithubRelease {
        tag_name: tag.into(),
        name: Some(format!("Release {tag}")),
        html_url: format!("https://github.example/releases/{tag}"),
        published_at: Some(base_time() - chrono::Duration::hours(hours_ago)),
        body: Some(format!("<p>{tag}</p>")),
        draft: false,
        prerelease: false,
    }
}

pub fn draft(tag: &str) -> GithubRelease {
    GithubRelease {
        published_at: None,
        draft: true,
        ..release(tag, 0)
    }
}

/// Newest-first releases `prefix1..=prefixN`, `prefixN` being the newest.
pub fn releases(prefix: &str, n: usize, start_hours_ago: i64, step: i64) -> Vec<GithubRelease> {
    (0..n)
        .map(|i| {
            release(
                &format!("{prefix}{}", n - i),
                start_hours_ago + step * i as i64,
            )
        })
        .collect()
}

pub fn test_config() -> Config {
    let mut config = Config::default_config();
    config.db_path = None;
    config
}

pub fn context(upstream: Arc<FakeUpstream>, config: Config) -> (FeedContext, Arc<CollectorSink>) {
    let sink = Arc::new(CollectorSink::default());
    let events: EventSinkHandle = sink.clone();
    (FeedContext::new(config, upstream, "test-token", events), sink)
}
