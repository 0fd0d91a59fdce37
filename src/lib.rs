//! Beneficiary Dedup - duplicate-candidate matching for livelihood-assistance records
//!
//! Flags existing participant and household-member records that likely
//! describe the same person as a candidate record, by combining name
//! similarity, a Soundex phonetic check, address similarity and birthday
//! similarity into one score.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    levenshtein_distance, similarity_percentage, soundex, DuplicateMatcher, MatchError,
    RecordSnapshot,
};
pub use crate::models::{
    DuplicateReport, HouseholdRecord, MatchConfig, MatchResult, MemberRecord, PersonRecord,
    ScoringWeights, SoundexMode,
};
pub use crate::services::{RecordRepository, RepositoryError, InMemoryRepository};
