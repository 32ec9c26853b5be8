use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::workflows::candidates::{Candidate, CandidateStatus, UnknownVariant};

/// Status restriction applied after the search predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(CandidateStatus),
}

impl StatusFilter {
    pub fn matches(self, status: CandidateStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed
            .parse::<CandidateStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| UnknownVariant::new("status filter", value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Institution,
    #[default]
    SubmissionDate,
    TotalScore,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::Institution,
        SortField::SubmissionDate,
        SortField::TotalScore,
        SortField::Status,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Institution => "institution",
            SortField::SubmissionDate => "submissionDate",
            SortField::TotalScore => "totalScore",
            SortField::Status => "status",
        }
    }

    /// Ascending comparison of two candidates on this field. Text compares by its
    /// lowercase form.
    pub fn compare(self, left: &Candidate, right: &Candidate) -> Ordering {
        match self {
            SortField::Name => compare_text(&left.name, &right.name),
            SortField::Institution => compare_text(&left.institution, &right.institution),
            SortField::SubmissionDate => left.submission_date.cmp(&right.submission_date),
            SortField::TotalScore => left.total_score.cmp(&right.total_score),
            SortField::Status => left.status.label().cmp(right.status.label()),
        }
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant::new("sort field", value))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortDirection {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(UnknownVariant::new("sort direction", value)),
        }
    }
}

/// The five dashboard inputs. Holds no derived state; [`DashboardQuery::apply`] recomputes
/// the listing from scratch on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl DashboardQuery {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.sort_direction = direction;
        self
    }

    /// Case-insensitive substring match on name, email, or institution. An empty term
    /// matches everything.
    pub fn matches_search(&self, candidate: &Candidate) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&candidate.name, &candidate.email, &candidate.institution]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.matches_search(candidate) && self.status.matches(candidate.status)
    }

    /// Filter then sort. Equal keys keep their input order in either direction.
    pub fn apply<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        let mut rows: Vec<&Candidate> = candidates
            .iter()
            .filter(|candidate| self.matches(candidate))
            .collect();
        let field = self.sort_field;
        let direction = self.sort_direction;
        rows.sort_by(|left, right| direction.orient(field.compare(left, right)));
        rows
    }
}
