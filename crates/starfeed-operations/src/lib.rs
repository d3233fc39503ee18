pub mod context;
pub mod fetcher;
pub mod lister;
pub mod service;

pub use context::FeedContext;
pub use service::{FeedService, Origin, Outcome};
pub use tokio_util::sync::CancellationToken;
