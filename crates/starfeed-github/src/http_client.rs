use std::time::Duration;

use ureq::{
    http::{self, HeaderMap, Uri},
    typestate::WithoutBody,
    Agent, Proxy, RequestBuilder,
};

pub const DEFAULT_USER_AGENT: &str = concat!("starfeed/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub headers: Option<HeaderMap>,
    pub proxy: Option<Proxy>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    /// A config with the crate user agent and no proxy, extra headers or timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use starfeed_github::http_client::ClientConfig;
    ///
    /// let cfg = ClientConfig::default();
    /// assert!(cfg.user_agent.as_deref().unwrap().starts_with("starfeed/"));
    /// assert!(cfg.timeout.is_none());
    /// ```
    fn default() -> Self {
        Self {
            user_agent: Some(DEFAULT_USER_AGENT.into()),
            headers: None,
            proxy: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Builds an `Agent` from this config.
    ///
    /// Non-2xx responses are returned as regular responses rather than
    /// errors so callers can read the error body.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .proxy(self.proxy.clone())
            .timeout_global(self.timeout)
            .http_status_as_error(false);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

/// An agent paired with the headers every request should carry.
#[derive(Clone)]
pub struct HttpClient {
    agent: Agent,
    headers: Option<HeaderMap>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            agent: config.build(),
            headers: config.headers.clone(),
        }
    }

    pub fn get<T>(&self, uri: T) -> RequestBuilder<WithoutBody>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        apply_headers(self.agent.get(uri), &self.headers)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

fn apply_headers<B>(mut req: RequestBuilder<B>, headers: &Option<HeaderMap>) -> RequestBuilder<B> {
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            req = req.header(key, value);
        }
    }
    req
}

#[cfg(test)]
mod tests {
    use ureq::http::HeaderValue;

    use super::*;

    #[test]
    fn test_build_with_timeout_and_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-starfeed-test", HeaderValue::from_static("1"));

        let config = ClientConfig {
            user_agent: Some("starfeed-test/0.0".into()),
            headers: Some(headers),
            proxy: None,
            timeout: Some(Duration::from_secs(10)),
        };
        let client = HttpClient::new(&config);
        assert_eq!(client.headers.as_ref().map(HeaderMap::len), Some(1));
        let _req = client.get("http://localhost/");
    }

    #[test]
    fn test_default_client_has_no_headers() {
        let client = HttpClient::default();
        assert!(client.headers.is_none());
    }
}
