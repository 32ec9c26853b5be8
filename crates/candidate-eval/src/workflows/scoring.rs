//! Deterministic prestige scoring.
//!
//! A publication's score is the registry's point value for its source, captured when the
//! source is set. Unknown sources score 0 so a dangling reference never blocks a
//! submission.

use serde::Serialize;
use tracing::debug;

use super::candidates::{Candidate, Publication, PublicationId};
use super::sources::{SourceId, SourceLookup};

/// Points for `source_id`, or 0 when the registry does not know it.
pub fn score_for_source<L>(source_id: &SourceId, registry: &L) -> u32
where
    L: SourceLookup + ?Sized,
{
    match registry.source(source_id) {
        Some(source) => source.points,
        None => {
            debug!(source_id = %source_id, "unknown publication source scored as 0");
            0
        }
    }
}

/// Score a publication against its current `source`.
pub fn score_publication<L>(publication: &Publication, registry: &L) -> u32
where
    L: SourceLookup + ?Sized,
{
    score_for_source(&publication.source, registry)
}

/// Set `source` and refresh the score snapshot. This is the only place a stored
/// publication score changes.
pub fn assign_source<L>(publication: &mut Publication, source: SourceId, registry: &L) -> u32
where
    L: SourceLookup + ?Sized,
{
    publication.source = source;
    publication.score = score_publication(publication, registry);
    publication.score
}

/// Sum of the stored publication scores. Accumulates in `u64` so any list of `u32`
/// scores fits.
pub fn total_score(publications: &[Publication]) -> u64 {
    publications
        .iter()
        .map(|publication| u64::from(publication.score))
        .sum()
}

/// One publication's contribution, with the live registry value for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreLine {
    pub publication_id: PublicationId,
    pub title: String,
    pub source_id: SourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub stored_score: u32,
    pub current_points: u32,
}

impl ScoreLine {
    /// The registry value changed (or the source vanished) since the snapshot was taken.
    pub fn is_stale(&self) -> bool {
        self.stored_score != self.current_points
    }
}

/// Audit view of a candidate's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub lines: Vec<ScoreLine>,
    pub stored_total: u64,
    pub publication_total: u64,
    pub drift: i64,
}

impl ScoreBreakdown {
    pub fn is_consistent(&self) -> bool {
        self.drift == 0
    }
}

pub fn breakdown<L>(candidate: &Candidate, registry: &L) -> ScoreBreakdown
where
    L: SourceLookup + ?Sized,
{
    let lines = candidate
        .publications
        .iter()
        .map(|publication| {
            let source = registry.source(&publication.source);
            ScoreLine {
                publication_id: publication.id.clone(),
                title: publication.title.clone(),
                source_id: publication.source.clone(),
                source_name: source.map(|s| s.name.clone()),
                category: source.map(|s| s.category.clone()),
                stored_score: publication.score,
                current_points: source.map(|s| s.points).unwrap_or(0),
            }
        })
        .collect();

    ScoreBreakdown {
        lines,
        stored_total: candidate.total_score,
        publication_total: total_score(&candidate.publications),
        drift: candidate.score_drift(),
    }
}
