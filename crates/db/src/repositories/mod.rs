//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod cache_repo;
pub mod player_repo;
pub mod query_repo;
pub mod search_count_repo;

pub use cache_repo::CacheRepo;
pub use player_repo::{PlayerRepo, TableCounts};
pub use query_repo::QueryRepo;
pub use search_count_repo::SearchCountRepo;
