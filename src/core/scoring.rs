use crate::core::{
    candidates::ComparisonUnit,
    phonetic::soundex_score,
    similarity::similarity_percentage,
};
use crate::models::{PersonRecord, ScoringWeights, SoundexMode};

/// The four independent similarity signals, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentScores {
    pub name: u8,
    pub soundex: u8,
    pub location: u8,
    pub birthday: u8,
}

impl ComponentScores {
    /// Weighted mean of the components, rounded to the nearest integer
    ///
    /// score = round(
    ///     (name * w_name + soundex * w_soundex
    ///      + location * w_location + birthday * w_birthday) / sum(w)
    /// )
    ///
    /// With equal weights this is the plain mean of the four scores.
    pub fn average(&self, weights: &ScoringWeights) -> u8 {
        let total_weight = weights.total();
        if total_weight <= 0.0 {
            return 0;
        }

        let weighted = self.name as f64 * weights.name
            + self.soundex as f64 * weights.soundex
            + self.location as f64 * weights.location
            + self.birthday as f64 * weights.birthday;

        (weighted / total_weight).round().clamp(0.0, 100.0) as u8
    }
}

/// Score a candidate against one existing record
pub fn score_unit(
    candidate: &PersonRecord,
    unit: &ComparisonUnit<'_>,
    soundex_mode: SoundexMode,
) -> ComponentScores {
    ComponentScores {
        name: similarity_percentage(&candidate.name, unit.name),
        soundex: soundex_score(&candidate.name, unit.name, soundex_mode),
        location: similarity_percentage(&candidate.address, unit.location),
        birthday: similarity_percentage(&candidate.birthday, unit.birthday),
    }
}
