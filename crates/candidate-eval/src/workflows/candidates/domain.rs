use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::sources::SourceId;

/// Identifier wrapper for submitted candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of a publication within its candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub String);

impl PublicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Journal,
    Conference,
    Book,
    Chapter,
    Patent,
    Other,
}

impl PublicationType {
    pub const ALL: [PublicationType; 6] = [
        PublicationType::Journal,
        PublicationType::Conference,
        PublicationType::Book,
        PublicationType::Chapter,
        PublicationType::Patent,
        PublicationType::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PublicationType::Journal => "journal",
            PublicationType::Conference => "conference",
            PublicationType::Book => "book",
            PublicationType::Chapter => "chapter",
            PublicationType::Patent => "patent",
            PublicationType::Other => "other",
        }
    }
}

impl FromStr for PublicationType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
            .ok_or_else(|| UnknownVariant::new("publication type", value))
    }
}

/// A publication owned by its candidate. `score` is a snapshot of the source's points at
/// the moment `source` was set, never a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: PublicationId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PublicationType,
    pub source: SourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub publication_date: NaiveDate,
    pub score: u32,
}

/// Review lifecycle. Any state may move to any other; none is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

/// Presentation hint for status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Neutral,
    Success,
    Destructive,
    Warning,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::Pending,
        CandidateStatus::Approved,
        CandidateStatus::Rejected,
        CandidateStatus::Flagged,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "pending",
            CandidateStatus::Approved => "approved",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Flagged => "flagged",
        }
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            CandidateStatus::Pending => "Pending",
            CandidateStatus::Approved => "Approved",
            CandidateStatus::Rejected => "Rejected",
            CandidateStatus::Flagged => "Flagged",
        }
    }

    pub const fn badge_tone(self) -> BadgeTone {
        match self {
            CandidateStatus::Pending => BadgeTone::Neutral,
            CandidateStatus::Approved => BadgeTone::Success,
            CandidateStatus::Rejected => BadgeTone::Destructive,
            CandidateStatus::Flagged => BadgeTone::Warning,
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CandidateStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownVariant::new("candidate status", value))
    }
}

/// Reviewer's 1..=5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReviewerScore(u8);

impl ReviewerScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ReviewerScoreOutOfRange> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReviewerScoreOutOfRange(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ReviewerScore {
    type Error = ReviewerScoreOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReviewerScore> for u8 {
    fn from(score: ReviewerScore) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("reviewer score must be between 1 and 5 (found {0})")]
pub struct ReviewerScoreOutOfRange(pub u8);

/// Raised when parsing a closed enumeration from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// A submitted candidate record.
///
/// `total_score` is the sum of publication scores at submission time. Later edits to
/// individual publications do not update it; see [`Candidate::score_drift`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub status: CandidateStatus,
    pub total_score: u64,
    pub publications: Vec<Publication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_score: Option<ReviewerScore>,
}

impl Candidate {
    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    /// `total_score / publication_count`, or 0 without publications.
    pub fn average_publication_score(&self) -> f64 {
        if self.publications.is_empty() {
            0.0
        } else {
            self.total_score as f64 / self.publications.len() as f64
        }
    }

    /// Stored total minus the sum of the stored publication scores.
    pub fn score_drift(&self) -> i64 {
        let publications: i128 = self
            .publications
            .iter()
            .map(|publication| i128::from(publication.score))
            .sum();
        let drift = i128::from(self.total_score) - publications;
        i64::try_from(drift).unwrap_or(if drift < 0 { i64::MIN } else { i64::MAX })
    }

    pub fn publication(&self, id: &PublicationId) -> Option<&Publication> {
        self.publications
            .iter()
            .find(|publication| &publication.id == id)
    }

    pub(crate) fn publication_mut(&mut self, id: &PublicationId) -> Option<&mut Publication> {
        self.publications
            .iter_mut()
            .find(|publication| &publication.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively_and_rejects_unknown_values() {
        assert_eq!(
            "Approved".parse::<CandidateStatus>(),
            Ok(CandidateStatus::Approved)
        );
        let err = "archived".parse::<CandidateStatus>().expect_err("not a status");
        assert_eq!(err.to_string(), "unknown candidate status `archived`");
    }

    #[test]
    fn every_status_has_a_badge_tone() {
        let tones: Vec<BadgeTone> = CandidateStatus::ALL
            .into_iter()
            .map(CandidateStatus::badge_tone)
            .collect();
        assert_eq!(
            tones,
            vec![
                BadgeTone::Neutral,
                BadgeTone::Success,
                BadgeTone::Destructive,
                BadgeTone::Warning
            ]
        );
    }

    #[test]
    fn reviewer_score_is_bounded() {
        assert!(ReviewerScore::new(0).is_err());
        assert_eq!(ReviewerScore::new(5).map(ReviewerScore::get), Ok(5));
        assert!(serde_json::from_str::<ReviewerScore>("6").is_err());
        assert_eq!(
            serde_json::from_str::<ReviewerScore>("3").expect("valid"),
            ReviewerScore::new(3).expect("valid")
        );
    }

    #[test]
    fn publication_type_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&PublicationType::Chapter).expect("serialize"),
            "\"chapter\""
        );
        assert_eq!("PATENT".parse::<PublicationType>(), Ok(PublicationType::Patent));
    }
}
