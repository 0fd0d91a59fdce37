use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{DuplicateMatcher, MatchError};
use crate::models::{
    CheckDuplicatesRequest, ErrorResponse, HealthResponse, RecordReviewRequest,
    RecordReviewResponse, ReviewListResponse,
};
use crate::services::{CachedRepository, NewReview, PostgresClient, RecordRepository};
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of reviews returned per candidate
const MAX_REVIEWS: usize = 200;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn RecordRepository>,
    /// Set when `repository` is the snapshot cache, for health reporting
    pub cache: Option<Arc<CachedRepository>>,
    pub postgres: Arc<PostgresClient>,
    pub matcher: DuplicateMatcher,
    pub fetch_timeout: Duration,
}

/// Configure all duplicate-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/duplicates/check", web::post().to(check_duplicates))
        .route("/duplicates/reviews", web::post().to(record_review))
        .route("/duplicates/reviews", web::get().to(list_reviews));
}

fn error_response(
    status: actix_web::http::StatusCode,
    error: &str,
    message: String,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
    })
}

/// Check a candidate record for likely duplicates
///
/// POST /api/v1/duplicates/check
///
/// Request body:
/// ```json
/// {
///   "name": "Maria Santos",
///   "address": "123 Main St, Manila",
///   "birthday": "1981-05-03",
///   "recordId": "optional id of the record being edited"
/// }
/// ```
async fn check_duplicates(
    state: web::Data<AppState>,
    req: web::Json<CheckDuplicatesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for duplicate check: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let candidate = req.into_inner().into_record();

    let fetch = state.matcher.fetch_snapshot(state.repository.as_ref());
    let snapshot = match tokio::time::timeout(state.fetch_timeout, fetch).await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(MatchError::Repository(e))) => {
            tracing::error!("Failed to fetch records for duplicate check: {}", e);
            return error_response(
                actix_web::http::StatusCode::BAD_GATEWAY,
                "Failed to fetch records",
                e.to_string(),
            );
        }
        Err(_) => {
            tracing::error!("Record fetch timed out after {:?}", state.fetch_timeout);
            return error_response(
                actix_web::http::StatusCode::GATEWAY_TIMEOUT,
                "Record fetch timed out",
                format!("No response from the record store within {:?}", state.fetch_timeout),
            );
        }
    };

    let report = state.matcher.find_in_snapshot(&candidate, &snapshot);

    HttpResponse::Ok().json(report)
}

/// Log a reviewer decision on a duplicate suggestion
///
/// POST /api/v1/duplicates/reviews
///
/// Request body:
/// ```json
/// {
///   "candidateId": "string",
///   "sourceId": "string",
///   "kind": "personal|household",
///   "decision": "confirmed|dismissed",
///   "averageScore": 92,
///   "reviewer": "optional",
///   "note": "optional"
/// }
/// ```
async fn record_review(
    state: web::Data<AppState>,
    req: web::Json<RecordReviewRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    let review = NewReview {
        candidate_id: req.candidate_id,
        source_id: req.source_id,
        kind: req.kind,
        decision: req.decision,
        average_score: req.average_score,
        reviewer: req.reviewer,
        note: req.note,
    };

    match state.postgres.record_review(&review).await {
        Ok(review_id) => HttpResponse::Ok().json(RecordReviewResponse {
            success: true,
            review_id,
        }),
        Err(e) => {
            tracing::error!("Failed to record review: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record review".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Review history for a candidate
///
/// GET /api/v1/duplicates/reviews?candidateId={candidateId}
async fn list_reviews(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let candidate_id = match query.get("candidateId") {
        Some(id) if !id.is_empty() => id,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing candidateId parameter".to_string(),
                message: "candidateId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.postgres.list_reviews(candidate_id, MAX_REVIEWS).await {
        Ok(reviews) => HttpResponse::Ok().json(ReviewListResponse {
            candidate_id: candidate_id.clone(),
            count: reviews.len(),
            reviews,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch reviews for {}: {}", candidate_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch reviews".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            cache: None,
        };

        assert_eq!(response.status, "healthy");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("cache").is_none());
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let response = error_response(
            StatusCode::BAD_GATEWAY,
            "Failed to fetch records",
            "down".to_string(),
        );
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status_code, 502);
        assert_eq!(parsed.message, "down");
    }
}
