use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use starfeed_github::models::{GithubRelease, StarredRepo};
use starfeed_utils::time::time_ago;

/// A starred repository as discovered by the lister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner_login: String,
    pub name: String,
    pub owner_avatar_url: String,
}

impl RepositoryRef {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner_login, self.name)
    }
}

impl From<StarredRepo> for RepositoryRef {
    fn from(repo: StarredRepo) -> Self {
        Self {
            owner_login: repo.owner.login,
            name: repo.name,
            owner_avatar_url: repo.owner.avatar_url,
        }
    }
}

/// One published release, in the form it is cached and served.
///
/// The relative age is deliberately absent: it is derived from
/// `published_at` each time a record is read, see [`ReleaseRecord::published_ago`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub repo_name: String,
    pub tag_name: String,
    pub release_name: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub avatar_url: String,
    pub changelog: String,
}

impl ReleaseRecord {
    /// Builds a record from an upstream release of `repo`.
    ///
    /// Returns `None` for releases without a publish time (drafts).
    pub fn from_release(repo: &RepositoryRef, release: GithubRelease) -> Option<Self> {
        let published_at = release.published_at?;
        Some(Self {
            repo_name: repo.name.clone(),
            tag_name: release.tag_name,
            release_name: release.name.unwrap_or_default(),
            published_at,
            url: release.html_url,
            avatar_url: repo.owner_avatar_url.clone(),
            changelog: release.body.unwrap_or_default(),
        })
    }

    /// Relative age label such as `3 days ago`.
    pub fn published_ago(&self, now: DateTime<Utc>) -> String {
        time_ago(self.published_at, now)
    }
}

/// The ordered result of one aggregation run.
///
/// Records are newest first. Only the aggregator builds new snapshots;
/// everything else gets one by decoding a cached copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<ReleaseRecord>);

impl Snapshot {
    pub(crate) fn from_sorted(records: Vec<ReleaseRecord>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[ReleaseRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReleaseRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Snapshot {
    type Item = ReleaseRecord;
    type IntoIter = std::vec::IntoIter<ReleaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a ReleaseRecord;
    type IntoIter = std::slice::Iter<'a, ReleaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A window onto a snapshot, with navigation numbers.
///
/// `prev_page` and `next_page` are 0 when there is no such page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    pub releases: &'a [ReleaseRecord],
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_page: usize,
    pub next_page: usize,
}

impl<'a> Page<'a> {
    /// Pairs each record on the page with its age label relative to `now`.
    pub fn labelled(&self, now: DateTime<Utc>) -> impl Iterator<Item = (&'a ReleaseRecord, String)> {
        let releases: &'a [ReleaseRecord] = self.releases;
        releases.iter().map(move |r| (r, r.published_ago(now)))
    }

    pub fn has_prev(&self) -> bool {
        self.prev_page != 0
    }

    pub fn has_next(&self) -> bool {
        self.next_page != 0
    }
}
