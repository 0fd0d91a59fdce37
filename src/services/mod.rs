// Service exports
pub mod appwrite;
pub mod cache;
pub mod postgres;
pub mod repository;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use cache::{CachedRepository, CacheKey, CacheStats};
pub use postgres::{PostgresClient, PostgresError, NewReview};
pub use repository::{RecordRepository, RepositoryError, InMemoryRepository};
