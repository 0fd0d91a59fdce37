// Core algorithm exports
pub mod candidates;
pub mod matcher;
pub mod phonetic;
pub mod scoring;
pub mod similarity;

pub use candidates::{ComparisonUnit, household_units, participant_units, is_self};
pub use matcher::{DuplicateMatcher, MatchError, RecordSnapshot};
pub use phonetic::{soundex, soundex_with_mode, soundex_score};
pub use scoring::{ComponentScores, score_unit};
pub use similarity::{levenshtein_distance, similarity_percentage};
