use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
    time::Duration,
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use starfeed_utils::{
    path::{resolve_path, xdg_config_home, xdg_data_home},
    time::parse_duration,
};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CACHE_KEY: &str = "releases";
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_PER_REPO_CAP: usize = 3;
pub const MAX_CONCURRENCY: usize = 5;
pub const MAX_PER_REPO_CAP: usize = 3;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT: &str = "10s";

/// Starfeed configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Base URL of the GitHub REST API.
    /// Default: https://api.github.com
    pub api_url: Option<String>,

    /// Environment variables checked, in order, for the GitHub token.
    /// Default: ["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_API_KEY"]
    pub token_env: Option<Vec<String>>,

    /// Path of the SQLite database holding the cached feed.
    /// Default: $XDG_DATA_HOME/starfeed/starfeed.db
    pub db_path: Option<String>,

    /// Key under which the aggregated feed is cached.
    /// Default: releases
    pub cache_key: Option<String>,

    /// Maximum number of concurrent release requests, between 1 and 5.
    /// Default: 5
    pub concurrency: Option<usize>,

    /// Maximum number of releases kept per repository, between 1 and 3.
    /// Default: 3
    pub per_repo_cap: Option<usize>,

    /// Number of starred repositories requested per page.
    /// Default: 100
    pub page_size: Option<u32>,

    /// Number of releases shown per feed page.
    /// Default: 10
    pub per_page: Option<usize>,

    /// Timeout applied to every upstream request.
    /// Default: 10s
    pub request_timeout: Option<String>,

    /// User agent sent with upstream requests.
    /// Default: starfeed/<version>
    pub user_agent: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("STARFEED_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("starfeed").join("config.toml"),
    })
});

pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap();
    *global_config = Some(config);
    Ok(())
}

pub fn get_config() -> Config {
    {
        let config_guard = CONFIG.read().unwrap();
        if let Some(config) = config_guard.as_ref() {
            return config.clone();
        }
    }

    let mut config_guard = CONFIG.write().unwrap();
    config_guard
        .get_or_insert_with(Config::default_config)
        .clone()
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            api_url: Some(DEFAULT_API_URL.to_string()),
            token_env: Some(default_token_env()),
            db_path: Some(format!(
                "{}/starfeed/starfeed.db",
                xdg_data_home().display()
            )),
            cache_key: Some(DEFAULT_CACHE_KEY.to_string()),
            concurrency: Some(DEFAULT_CONCURRENCY),
            per_repo_cap: Some(DEFAULT_PER_REPO_CAP),
            page_size: Some(DEFAULT_PAGE_SIZE),
            per_page: Some(DEFAULT_PER_PAGE),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT.to_string()),
            user_agent: Some(default_user_agent()),
        }
    }

    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => {
                debug!(path = %config_path.display(), "loading configuration");
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default_config(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    /// Fills in unset fields with defaults and validates the result.
    pub fn resolve(&mut self) -> Result<()> {
        let defaults = Self::default_config();

        self.api_url.get_or_insert_with(|| DEFAULT_API_URL.into());
        self.token_env.get_or_insert_with(default_token_env);
        if self.db_path.is_none() {
            self.db_path = defaults.db_path;
        }
        self.cache_key
            .get_or_insert_with(|| DEFAULT_CACHE_KEY.into());
        self.concurrency.get_or_insert(DEFAULT_CONCURRENCY);
        self.per_repo_cap.get_or_insert(DEFAULT_PER_REPO_CAP);
        self.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
        self.per_page.get_or_insert(DEFAULT_PER_PAGE);
        self.request_timeout
            .get_or_insert_with(|| DEFAULT_REQUEST_TIMEOUT.into());
        self.user_agent.get_or_insert_with(default_user_agent);

        if !(1..=MAX_CONCURRENCY).contains(&self.concurrency.unwrap_or(0)) {
            return Err(invalid("concurrency", "must be between 1 and 5"));
        }
        if !(1..=MAX_PER_REPO_CAP).contains(&self.per_repo_cap.unwrap_or(0)) {
            return Err(invalid("per_repo_cap", "must be between 1 and 3"));
        }
        if !(1..=100).contains(&self.page_size()) {
            return Err(invalid("page_size", "must be between 1 and 100"));
        }
        if self.per_page == Some(0) {
            return Err(invalid("per_page", "must be at least 1"));
        }
        if self.cache_key().trim().is_empty() {
            return Err(invalid("cache_key", "must not be empty"));
        }
        self.request_timeout()?;

        Ok(())
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn cache_key(&self) -> &str {
        self.cache_key.as_deref().unwrap_or(DEFAULT_CACHE_KEY)
    }

    /// Request ceiling for the release fan-out, never above [`MAX_CONCURRENCY`].
    pub fn concurrency(&self) -> usize {
        self.concurrency
            .unwrap_or(DEFAULT_CONCURRENCY)
            .clamp(1, MAX_CONCURRENCY)
    }

    /// Releases kept per repository, never above [`MAX_PER_REPO_CAP`].
    pub fn per_repo_cap(&self) -> usize {
        self.per_repo_cap
            .unwrap_or(DEFAULT_PER_REPO_CAP)
            .clamp(1, MAX_PER_REPO_CAP)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        let raw = self
            .request_timeout
            .as_deref()
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        match parse_duration(raw) {
            Some(0) | None => Err(ConfigError::InvalidDuration(raw.to_string())),
            Some(millis) => Ok(Duration::from_millis(millis.min(u64::MAX as u128) as u64)),
        }
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("STARFEED_DB") {
            return Ok(resolve_path(&env_path)?);
        }
        match &self.db_path {
            Some(db_path) => Ok(resolve_path(db_path)?),
            None => Ok(xdg_data_home().join("starfeed").join("starfeed.db")),
        }
    }

    /// Returns the first non-empty token found in the configured environment variables.
    pub fn credential(&self) -> Result<String> {
        let vars = self.token_env.clone().unwrap_or_else(default_token_env);
        vars.iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
            .ok_or(ConfigError::MissingCredential { vars })
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        Ok(doc)
    }
}

pub fn generate_default_config() -> Result<()> {
    let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(())
}

fn default_token_env() -> Vec<String> {
    ["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_API_KEY"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_user_agent() -> String {
    format!("starfeed/{}", env!("CARGO_PKG_VERSION"))
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}
