// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    PersonRecord, MemberRecord, HouseholdRecord, MatchKind, MatchResult, DuplicateReport,
    ScoringWeights, SoundexMode, MatchConfig, Decision, ReviewDecision,
};
pub use requests::{CheckDuplicatesRequest, RecordReviewRequest};
pub use responses::{HealthResponse, ErrorResponse, RecordReviewResponse, ReviewListResponse};
