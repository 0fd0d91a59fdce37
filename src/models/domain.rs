use serde::{Deserialize, Deserializer, Serialize};

/// Individual participant record, also used as the candidate being checked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub birthday: String,
    #[serde(rename = "recordId", default, deserialize_with = "null_as_empty")]
    pub record_id: String,
}

impl PersonRecord {
    pub fn new(
        record_id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        birthday: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            birthday: birthday.into(),
            record_id: record_id.into(),
        }
    }
}

/// Member embedded in a household document. Members carry no address of their
/// own and are compared using the household address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub birthday: String,
}

/// Family/household document with its embedded member list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    #[serde(rename = "householdId", default, deserialize_with = "null_as_empty")]
    pub household_id: String,
    #[serde(rename = "householdName", default, deserialize_with = "null_as_empty")]
    pub household_name: String,
    #[serde(rename = "householdAddress", default, deserialize_with = "null_as_empty")]
    pub household_address: String,
    #[serde(default, deserialize_with = "members_from_array_or_string")]
    pub members: Vec<MemberRecord>,
}

/// Which collection a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Personal,
    Household,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Personal => "personal",
            MatchKind::Household => "household",
        }
    }
}

impl std::str::FromStr for MatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(MatchKind::Personal),
            "household" => Ok(MatchKind::Household),
            other => Err(format!("unknown match kind '{}'", other)),
        }
    }
}

/// One likely duplicate, with the four component scores and their average
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "sourceId")]
    pub source_id: String,
    #[serde(rename = "matchedName")]
    pub matched_name: String,
    #[serde(rename = "matchedLocation")]
    pub matched_location: String,
    #[serde(rename = "matchedBirthday")]
    pub matched_birthday: String,
    #[serde(rename = "householdName", default, skip_serializing_if = "Option::is_none")]
    pub household_name: Option<String>,
    #[serde(rename = "nameScore")]
    pub name_score: u8,
    #[serde(rename = "soundexScore")]
    pub soundex_score: u8,
    #[serde(rename = "locationScore")]
    pub location_score: u8,
    #[serde(rename = "birthdayScore")]
    pub birthday_score: u8,
    #[serde(rename = "averageScore")]
    pub average_score: u8,
}

/// Outcome of a duplicate check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    #[serde(rename = "hasDuplicates")]
    pub has_duplicates: bool,
    #[serde(rename = "personalMatches")]
    pub personal_matches: Vec<MatchResult>,
    #[serde(rename = "householdMatches")]
    pub household_matches: Vec<MatchResult>,
}

impl DuplicateReport {
    pub fn new(personal_matches: Vec<MatchResult>, household_matches: Vec<MatchResult>) -> Self {
        Self {
            has_duplicates: !personal_matches.is_empty() || !household_matches.is_empty(),
            personal_matches,
            household_matches,
        }
    }
}

/// Relative weight of each similarity signal in the average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub name: f64,
    pub soundex: f64,
    pub location: f64,
    pub birthday: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.name + self.soundex + self.location + self.birthday
    }

    /// Weights must be finite, non-negative and not all zero
    pub fn validate(&self) -> Result<(), String> {
        let all = [self.name, self.soundex, self.location, self.birthday];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("weights must be finite and non-negative: {:?}", self));
        }
        if self.total() <= 0.0 {
            return Err("at least one weight must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            name: 0.25,
            soundex: 0.25,
            location: 0.25,
            birthday: 0.25,
        }
    }
}

/// Soundex output shape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundexMode {
    /// First letter plus every collapsed digit, no padding or truncation
    #[default]
    Variable,
    /// Traditional four-character code, zero padded
    Standard,
}

/// Tunable knobs of the duplicate matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Results are kept only when the average is strictly greater than this
    pub threshold: u8,
    pub weights: ScoringWeights,
    pub soundex_mode: SoundexMode,
    /// Sort each result list by average score, highest first
    pub sort_results: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 70,
            weights: ScoringWeights::default(),
            soundex_mode: SoundexMode::Variable,
            sort_results: false,
        }
    }
}

/// Reviewer verdict on a duplicate suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Confirmed,
    Dismissed,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Confirmed => "confirmed",
            Decision::Dismissed => "dismissed",
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" => Ok(Decision::Confirmed),
            "dismissed" => Ok(Decision::Dismissed),
            other => Err(format!("unknown decision '{}'", other)),
        }
    }
}

/// Append-only log entry recording how a suggestion was handled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub id: uuid::Uuid,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "sourceId")]
    pub source_id: String,
    pub kind: MatchKind,
    pub decision: Decision,
    #[serde(rename = "averageScore")]
    pub average_score: u8,
    pub reviewer: Option<String>,
    pub note: Option<String>,
    #[serde(rename = "reviewedAt")]
    pub reviewed_at: chrono::DateTime<chrono::Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Document stores without nested attribute types keep the member list as a
// JSON-encoded string.
fn members_from_array_or_string<'de, D>(deserializer: D) -> Result<Vec<MemberRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Members {
        List(Vec<MemberRecord>),
        Encoded(String),
    }

    match Option::<Members>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Members::List(members)) => Ok(members),
        Some(Members::Encoded(raw)) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(Members::Encoded(raw)) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}
