use miette::Diagnostic;
use starfeed_utils::error::{FileSystemError, PathError, UtilsError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(starfeed_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(starfeed_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(starfeed_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid value for `{field}`: {reason}")]
    #[diagnostic(code(starfeed_config::invalid_value))]
    InvalidValue { field: &'static str, reason: String },

    #[error("Invalid duration: {0}")]
    #[diagnostic(
        code(starfeed_config::invalid_duration),
        help("Use a duration such as `10s`, `1m30s` or `2h`")
    )]
    InvalidDuration(String),

    #[error("No GitHub token found")]
    #[diagnostic(
        code(starfeed_config::missing_credential),
        help("Set one of these environment variables: {}", .vars.join(", "))
    )]
    MissingCredential { vars: Vec<String> },

    #[error("IO error: {0}")]
    #[diagnostic(code(starfeed_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(starfeed_config::utils))]
    Utils(#[from] UtilsError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(starfeed_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(starfeed_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

impl From<FileSystemError> for ConfigError {
    fn from(err: FileSystemError) -> Self {
        Self::Utils(UtilsError::FileSystem(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
