use crate::models::{HouseholdRecord, MatchKind, PersonRecord};

/// A single existing record the candidate is compared against
///
/// Participants map one-to-one. Households are flattened into one unit per
/// member, each carrying the household's shared address as its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonUnit<'a> {
    pub kind: MatchKind,
    pub source_id: &'a str,
    pub name: &'a str,
    pub location: &'a str,
    pub birthday: &'a str,
    pub household_name: Option<&'a str>,
}

/// True when `other_id` identifies the candidate itself
///
/// A candidate without an identifier (a record not saved yet) excludes nothing.
#[inline]
pub fn is_self(candidate_id: &str, other_id: &str) -> bool {
    !candidate_id.is_empty() && candidate_id == other_id
}

/// Participants other than the candidate, in collection order
pub fn participant_units<'a>(
    candidate_id: &'a str,
    participants: &'a [PersonRecord],
) -> impl Iterator<Item = ComparisonUnit<'a>> + 'a {
    participants
        .iter()
        .filter(move |p| !is_self(candidate_id, &p.record_id))
        .map(|p| ComparisonUnit {
            kind: MatchKind::Personal,
            source_id: &p.record_id,
            name: &p.name,
            location: &p.address,
            birthday: &p.birthday,
            household_name: None,
        })
}

/// Every member of every household, in collection then member order
pub fn household_units<'a>(
    candidate_id: &'a str,
    households: &'a [HouseholdRecord],
) -> impl Iterator<Item = ComparisonUnit<'a>> + 'a {
    households
        .iter()
        .filter(move |h| !is_self(candidate_id, &h.household_id))
        .flat_map(|h| {
            h.members.iter().map(move |m| ComparisonUnit {
                kind: MatchKind::Household,
                source_id: &h.household_id,
                name: &m.name,
                location: &h.household_address,
                birthday: &m.birthday,
                household_name: Some(&h.household_name),
            })
        })
}
