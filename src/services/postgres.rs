use crate::models::{Decision, MatchKind, ReviewDecision};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// A decision about to be appended to the log
#[derive(Debug, Clone)]
pub struct NewReview {
    pub candidate_id: String,
    pub source_id: String,
    pub kind: MatchKind,
    pub decision: Decision,
    pub average_score: u8,
    pub reviewer: Option<String>,
    pub note: Option<String>,
}

/// PostgreSQL client for the duplicate review log
///
/// Reviews are only ever inserted. A later decision on the same pair is a new
/// row; the newest row is the current verdict.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool; migrations are the caller's responsibility
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Append a reviewer decision and return its id
    pub async fn record_review(&self, review: &NewReview) -> Result<uuid::Uuid, PostgresError> {
        if review.average_score > 100 {
            return Err(PostgresError::InvalidInput(format!(
                "average score {} is out of range",
                review.average_score
            )));
        }

        let id = uuid::Uuid::new_v4();

        let query = r#"
            INSERT INTO duplicate_reviews
                (id, candidate_id, source_id, kind, decision, average_score, reviewer, note, reviewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(&review.candidate_id)
            .bind(&review.source_id)
            .bind(review.kind.as_str())
            .bind(review.decision.as_str())
            .bind(review.average_score as i16)
            .bind(&review.reviewer)
            .bind(&review.note)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Recorded review {}: {} -> {} ({})",
            id,
            review.candidate_id,
            review.source_id,
            review.decision.as_str()
        );

        Ok(id)
    }

    /// Reviews for one candidate, newest first
    pub async fn list_reviews(
        &self,
        candidate_id: &str,
        limit: usize,
    ) -> Result<Vec<ReviewDecision>, PostgresError> {
        let query = r#"
            SELECT id, candidate_id, source_id, kind, decision, average_score, reviewer, note, reviewed_at
            FROM duplicate_reviews
            WHERE candidate_id = $1
            ORDER BY reviewed_at DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(candidate_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(review_from_row).collect()
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn review_from_row(row: &PgRow) -> Result<ReviewDecision, PostgresError> {
    let kind: String = row.try_get("kind")?;
    let decision: String = row.try_get("decision")?;
    let average_score: i16 = row.try_get("average_score")?;

    Ok(ReviewDecision {
        id: row.try_get("id")?,
        candidate_id: row.try_get("candidate_id")?,
        source_id: row.try_get("source_id")?,
        kind: kind.parse().map_err(PostgresError::InvalidInput)?,
        decision: decision.parse().map_err(PostgresError::InvalidInput)?,
        average_score: u8::try_from(average_score)
            .map_err(|_| PostgresError::InvalidInput(format!("stored score {}", average_score)))?,
        reviewer: row.try_get("reviewer")?,
        note: row.try_get("note")?,
        reviewed_at: row.try_get("reviewed_at")?,
    })
}
