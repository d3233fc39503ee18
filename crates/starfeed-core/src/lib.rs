use error::FeedError;

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod model;
pub mod paginate;

pub type FeedResult<T> = std::result::Result<T, FeedError>;
