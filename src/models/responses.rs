use serde::{Deserialize, Serialize};
use crate::models::domain::ReviewDecision;
use crate::services::CacheStats;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Snapshot cache state, absent when caching is disabled
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record review response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReviewResponse {
    pub success: bool,
    #[serde(rename = "reviewId")]
    pub review_id: uuid::Uuid,
}

/// Review history for one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListResponse {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub reviews: Vec<ReviewDecision>,
    pub count: usize,
}
