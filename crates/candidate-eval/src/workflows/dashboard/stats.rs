use serde::Serialize;

use crate::workflows::candidates::{Candidate, CandidateStatus};

/// Headline counts shown above the candidate table. Always computed over the whole
/// collection, independent of the active query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub flagged: usize,
    pub average_score: f64,
}

impl DashboardStats {
    pub fn collect(candidates: &[Candidate]) -> Self {
        let mut stats = DashboardStats {
            total: candidates.len(),
            ..DashboardStats::default()
        };
        let mut score_sum: u64 = 0;

        for candidate in candidates {
            score_sum = score_sum.saturating_add(candidate.total_score);
            match candidate.status {
                CandidateStatus::Pending => stats.pending += 1,
                CandidateStatus::Approved => stats.approved += 1,
                CandidateStatus::Rejected => stats.rejected += 1,
                CandidateStatus::Flagged => stats.flagged += 1,
            }
        }

        if stats.total > 0 {
            stats.average_score = score_sum as f64 / stats.total as f64;
        }
        stats
    }

    pub fn count(&self, status: CandidateStatus) -> usize {
        match status {
            CandidateStatus::Pending => self.pending,
            CandidateStatus::Approved => self.approved,
            CandidateStatus::Rejected => self.rejected,
            CandidateStatus::Flagged => self.flagged,
        }
    }
}
