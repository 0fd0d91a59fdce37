use crate::core::{
    candidates::{household_units, participant_units, ComparisonUnit},
    scoring::score_unit,
};
use crate::models::{DuplicateReport, HouseholdRecord, MatchConfig, MatchResult, PersonRecord};
use crate::services::repository::{RecordRepository, RepositoryError};
use thiserror::Error;

/// Errors from a duplicate check
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Failed to fetch records: {0}")]
    Repository(#[from] RepositoryError),
}

/// Both collections as fetched for one check
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    pub participants: Vec<PersonRecord>,
    pub households: Vec<HouseholdRecord>,
}

impl RecordSnapshot {
    /// Number of comparisons a scan performs (participants plus household members)
    pub fn comparison_count(&self) -> usize {
        self.participants.len()
            + self.households.iter().map(|h| h.members.len()).sum::<usize>()
    }
}

/// Duplicate-candidate matcher
///
/// # Pipeline
/// 1. Fetch participants and households (concurrently)
/// 2. Drop the candidate's own record
/// 3. Flatten households into one unit per member
/// 4. Score name, soundex, location and birthday for every unit
/// 5. Keep units whose weighted average is above the threshold
///
/// Every check is a full scan of both snapshots; nothing is indexed or cached
/// here.
#[derive(Debug, Clone)]
pub struct DuplicateMatcher {
    config: MatchConfig,
}

impl DuplicateMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Fetch both collections; either failure fails the whole fetch
    pub async fn fetch_snapshot(
        &self,
        repository: &dyn RecordRepository,
    ) -> Result<RecordSnapshot, MatchError> {
        let (participants, households) = tokio::try_join!(
            repository.list_participants(),
            repository.list_households()
        )?;

        tracing::debug!(
            "Fetched {} participants and {} households",
            participants.len(),
            households.len()
        );

        Ok(RecordSnapshot {
            participants,
            households,
        })
    }

    /// Check a candidate against the current contents of `repository`
    ///
    /// Fetch errors are returned as-is; a failure never reads as "no duplicates".
    pub async fn find_duplicates(
        &self,
        repository: &dyn RecordRepository,
        candidate: &PersonRecord,
    ) -> Result<DuplicateReport, MatchError> {
        let snapshot = self.fetch_snapshot(repository).await?;
        Ok(self.find_in_snapshot(candidate, &snapshot))
    }

    /// Check a candidate against snapshots the caller already holds
    pub fn find_in_snapshot(
        &self,
        candidate: &PersonRecord,
        snapshot: &RecordSnapshot,
    ) -> DuplicateReport {
        let candidate_id = candidate.record_id.as_str();

        let mut personal_matches: Vec<MatchResult> =
            participant_units(candidate_id, &snapshot.participants)
                .filter_map(|unit| self.evaluate(candidate, &unit))
                .collect();

        let mut household_matches: Vec<MatchResult> =
            household_units(candidate_id, &snapshot.households)
                .filter_map(|unit| self.evaluate(candidate, &unit))
                .collect();

        if self.config.sort_results {
            // stable, so equal scores keep collection order
            personal_matches.sort_by(|a, b| b.average_score.cmp(&a.average_score));
            household_matches.sort_by(|a, b| b.average_score.cmp(&a.average_score));
        }

        tracing::info!(
            "Duplicate check for record '{}' scanned {} records: {} personal, {} household matches",
            candidate.record_id,
            snapshot.comparison_count(),
            personal_matches.len(),
            household_matches.len()
        );

        DuplicateReport::new(personal_matches, household_matches)
    }

    /// Score one unit, keeping it only above the threshold
    fn evaluate(&self, candidate: &PersonRecord, unit: &ComparisonUnit<'_>) -> Option<MatchResult> {
        let scores = score_unit(candidate, unit, self.config.soundex_mode);
        let average_score = scores.average(&self.config.weights);

        if average_score <= self.config.threshold {
            return None;
        }

        Some(MatchResult {
            source_id: unit.source_id.to_string(),
            matched_name: unit.name.to_string(),
            matched_location: unit.location.to_string(),
            matched_birthday: unit.birthday.to_string(),
            household_name: unit.household_name.map(str::to_string),
            name_score: scores.name,
            soundex_score: scores.soundex,
            location_score: scores.location,
            birthday_score: scores.birthday,
            average_score,
        })
    }
}

impl Default for DuplicateMatcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}
