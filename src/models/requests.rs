use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Decision, MatchKind, PersonRecord};

/// Request to check a candidate record for duplicates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckDuplicatesRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(alias = "record_id", rename = "recordId", default)]
    pub record_id: String,
}

impl CheckDuplicatesRequest {
    pub fn into_record(self) -> PersonRecord {
        PersonRecord {
            name: self.name,
            address: self.address,
            birthday: self.birthday,
            record_id: self.record_id,
        }
    }
}

/// Request to log a reviewer decision on a duplicate suggestion
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordReviewRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "candidate_id", rename = "candidateId")]
    pub candidate_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "source_id", rename = "sourceId")]
    pub source_id: String,
    pub kind: MatchKind,
    pub decision: Decision,
    #[validate(range(max = 100))]
    #[serde(alias = "average_score", rename = "averageScore")]
    pub average_score: u8,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub note: Option<String>,
}
