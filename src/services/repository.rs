use crate::models::{HouseholdRecord, PersonRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a record source
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backend-specific failure, kept as the error source
    #[error("Record store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

/// Read-only access to the two record collections the matcher scans
///
/// Both calls return a full, unfiltered snapshot of their collection.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Every stored participant
    async fn list_participants(&self) -> Result<Vec<PersonRecord>, RepositoryError>;

    /// Every stored household with its embedded members
    async fn list_households(&self) -> Result<Vec<HouseholdRecord>, RepositoryError>;
}

/// Repository over records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    participants: Vec<PersonRecord>,
    households: Vec<HouseholdRecord>,
}

impl InMemoryRepository {
    pub fn new(participants: Vec<PersonRecord>, households: Vec<HouseholdRecord>) -> Self {
        Self {
            participants,
            households,
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn list_participants(&self) -> Result<Vec<PersonRecord>, RepositoryError> {
        Ok(self.participants.clone())
    }

    async fn list_households(&self) -> Result<Vec<HouseholdRecord>, RepositoryError> {
        Ok(self.households.clone())
    }
}
