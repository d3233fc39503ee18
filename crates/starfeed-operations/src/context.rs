use std::sync::Arc;

use starfeed_config::config::Config;
use starfeed_core::FeedResult;
use starfeed_events::EventSinkHandle;
use starfeed_github::{http_client::ClientConfig, GithubClient, Upstream};
use tracing::debug;

/// Everything a pipeline run needs: settings, the upstream, a credential
/// and somewhere to send progress events.
///
/// Cheap to clone; fetch tasks each hold a copy.
#[derive(Clone)]
pub struct FeedContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: Config,
    upstream: Arc<dyn Upstream>,
    credential: String,
    events: EventSinkHandle,
}

impl FeedContext {
    pub fn new(
        config: Config,
        upstream: Arc<dyn Upstream>,
        credential: impl Into<String>,
        events: EventSinkHandle,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                config,
                upstream,
                credential: credential.into(),
                events,
            }),
        }
    }

    /// Builds a context talking to the GitHub API named in `config`.
    ///
    /// `client` supplies proxy and extra headers; its timeout and user agent
    /// are taken from `config` unless already set. Fails before any request
    /// is made when no credential is available.
    pub fn connect(
        config: Config,
        mut client: ClientConfig,
        events: EventSinkHandle,
    ) -> FeedResult<Self> {
        let credential = config.credential()?;
        if client.timeout.is_none() {
            client.timeout = Some(config.request_timeout()?);
        }
        if client.user_agent.is_none() {
            client.user_agent = Some(config.user_agent());
        }

        let upstream = GithubClient::new(config.api_url(), &client)?;
        debug!(api = %upstream.base_url(), timeout = ?client.timeout, "connected upstream client");

        Ok(Self::new(config, Arc::new(upstream), credential, events))
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn upstream(&self) -> &Arc<dyn Upstream> {
        &self.inner.upstream
    }

    pub fn credential(&self) -> &str {
        &self.inner.credential
    }

    pub fn events(&self) -> &EventSinkHandle {
        &self.inner.events
    }
}
