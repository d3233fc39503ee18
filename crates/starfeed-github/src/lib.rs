pub mod client;
pub mod error;
pub mod http_client;
pub mod models;
pub mod traits;

pub use client::GithubClient;
pub use error::UpstreamError;
pub use traits::Upstream;
