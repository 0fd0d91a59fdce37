use crate::models::{HouseholdRecord, PersonRecord};
use crate::services::repository::{RecordRepository, RepositoryError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Repository decorator keeping collection snapshots in an in-memory TTL cache
///
/// Within the TTL, duplicate checks reuse the last fetched snapshot instead of
/// re-reading the whole collection. Records written in that window are not
/// seen until the entry expires.
pub struct CachedRepository {
    inner: Arc<dyn RecordRepository>,
    participants: moka::future::Cache<String, Arc<Vec<PersonRecord>>>,
    households: moka::future::Cache<String, Arc<Vec<HouseholdRecord>>>,
    ttl_secs: u64,
}

impl CachedRepository {
    pub fn new(inner: Arc<dyn RecordRepository>, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        Self {
            inner,
            participants: moka::future::CacheBuilder::new(1).time_to_live(ttl).build(),
            households: moka::future::CacheBuilder::new(1).time_to_live(ttl).build(),
            ttl_secs,
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            participants_cached: self.participants.contains_key(CacheKey::PARTICIPANTS),
            households_cached: self.households.contains_key(CacheKey::HOUSEHOLDS),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[async_trait]
impl RecordRepository for CachedRepository {
    async fn list_participants(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
        if let Some(hit) = self.participants.get(CacheKey::PARTICIPANTS).await {
            tracing::trace!("Snapshot cache hit: {}", CacheKey::PARTICIPANTS);
            return Ok(hit.as_ref().clone());
        }

        let fresh = self.inner.list_participants().await?;
        self.participants
            .insert(CacheKey::PARTICIPANTS.to_string(), Arc::new(fresh.clone()))
            .await;

        Ok(fresh)
    }

    async fn list_households(&self) -> Result<Vec<HouseholdRecord>, RepositoryError> {
        if let Some(hit) = self.households.get(CacheKey::HOUSEHOLDS).await {
            tracing::trace!("Snapshot cache hit: {}", CacheKey::HOUSEHOLDS);
            return Ok(hit.as_ref().clone());
        }

        let fresh = self.inner.list_households().await?;
        self.households
            .insert(CacheKey::HOUSEHOLDS.to_string(), Arc::new(fresh.clone()))
            .await;

        Ok(fresh)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub participants_cached: bool,
    pub households_cached: bool,
    pub ttl_secs: u64,
}

/// Cache keys for the collection snapshots
pub struct CacheKey;

impl CacheKey {
    pub const PARTICIPANTS: &'static str = "snapshot:participants";
    pub const HOUSEHOLDS: &'static str = "snapshot:households";
}
