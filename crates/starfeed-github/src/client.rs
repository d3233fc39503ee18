use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use ureq::http::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use crate::{
    error::{Result, UpstreamError},
    http_client::{ClientConfig, HttpClient},
    models::{ApiMessage, GithubRelease, StarredRepo},
    traits::Upstream,
};

pub const GITHUB_API: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Blocking client for the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    http: HttpClient,
    base_url: Url,
}

impl GithubClient {
    /// Creates a client talking to `base_url`, e.g. `https://api.github.com`
    /// or a GitHub Enterprise `https://host/api/v3`.
    pub fn new(base_url: &str, config: &ClientConfig) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base = Url::parse(&normalized).map_err(|source| {
            UpstreamError::InvalidUrl {
                url: base_url.to_string(),
                source,
            }
        })?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(Self {
            http: HttpClient::new(config),
            base_url: base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn starred_url(&self, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint(&["user", "starred"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    pub fn releases_url(&self, owner: &str, repo: &str) -> Url {
        self.endpoint(&["repos", owner, repo, "releases"])
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url, credential: &str) -> Result<T> {
        let mut req = self
            .http
            .get(url.as_str())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if !credential.is_empty() {
            req = req.header(AUTHORIZATION, &format!("Bearer {credential}"));
        }

        trace!(url = %url, "sending request");
        let mut resp = req.call()?;
        let status = resp.status().as_u16();
        let body = resp.body_mut().read_to_string()?;
        debug!(url = %url, status, bytes = body.len(), "received response");

        decode_response(url.as_str(), status, &body)
    }
}

impl Upstream for GithubClient {
    fn list_starred(
        &self,
        credential: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StarredRepo>> {
        self.get_json(&self.starred_url(page, per_page), credential)
    }

    fn list_releases(
        &self,
        credential: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<GithubRelease>> {
        self.get_json(&self.releases_url(owner, repo), credential)
    }
}

/// Decodes a response body into `T`.
///
/// A non-2xx status always becomes [`UpstreamError::Api`]. A 2xx body that
/// does not decode as `T` is retried as a `{ "message": ... }` object, so
/// an API complaint is reported as such rather than as a decode failure.
pub fn decode_response<T: DeserializeOwned>(url: &str, status: u16, body: &str) -> Result<T> {
    let api_message = || {
        serde_json::from_str::<ApiMessage>(body)
            .ok()
            .map(|m| m.message)
            .filter(|m| !m.is_empty())
    };

    if !(200..300).contains(&status) {
        return Err(UpstreamError::Api {
            status,
            message: api_message().unwrap_or_else(|| format!("unexpected status {status}")),
        });
    }

    serde_json::from_str(body).map_err(|source| {
        match api_message() {
            Some(message) => UpstreamError::Api { status, message },
            None => {
                UpstreamError::Decode {
                    url: url.to_string(),
                    source,
                }
            }
        }
    })
}
