//! Wire shapes of the GitHub REST responses starfeed reads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// One entry of `GET /user/starred`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StarredRepo {
    pub name: String,
    pub owner: Owner,
}

/// One entry of `GET /repos/{owner}/{repo}/releases`.
///
/// Only `tag_name` and `html_url` are guaranteed by the API; drafts come
/// back without a publish time.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// The `{ "message": ... }` body GitHub sends with failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
