use std::fmt::Write as _;

use candidate_eval::workflows::candidates::{BadgeTone, Candidate, CandidateStatus};
use candidate_eval::workflows::dashboard::DashboardStats;
use candidate_eval::workflows::scoring::ScoreBreakdown;
use candidate_eval::workflows::sources::PublicationSource;

pub(crate) fn source_line(source: &PublicationSource) -> String {
    let mut line = format!(
        "[{}] {} ({}) {} pts",
        source.id, source.name, source.category, source.points
    );
    if let Some(description) = &source.description {
        let _ = write!(line, " - {description}");
    }
    line
}

fn badge(status: CandidateStatus) -> String {
    let marker = match status.badge_tone() {
        BadgeTone::Neutral => ' ',
        BadgeTone::Success => '+',
        BadgeTone::Destructive => 'x',
        BadgeTone::Warning => '!',
    };
    format!("{marker} {}", status.display_label())
}

pub(crate) fn candidate_header() -> String {
    format!(
        "{:<36}  {:<24}  {:<24}  {:<10}  {:>5}  {:>4}  {}",
        "ID", "NAME", "INSTITUTION", "STATUS", "SCORE", "PUBS", "SUBMITTED"
    )
}

pub(crate) fn candidate_row(candidate: &Candidate) -> String {
    format!(
        "{:<36}  {:<24}  {:<24}  {:<10}  {:>5}  {:>4}  {}",
        candidate.id,
        candidate.name,
        candidate.institution,
        badge(candidate.status),
        candidate.total_score,
        candidate.publication_count(),
        candidate.submission_date.format("%Y-%m-%d %H:%M")
    )
}

pub(crate) fn stats_line(stats: &DashboardStats) -> String {
    format!(
        "{} candidates | {} pending | {} approved | {} rejected | {} flagged | avg score {:.1}",
        stats.total,
        stats.pending,
        stats.approved,
        stats.rejected,
        stats.flagged,
        stats.average_score
    )
}

pub(crate) fn candidate_details(candidate: &Candidate, breakdown: &ScoreBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} <{}>", candidate.name, candidate.email);
    let _ = writeln!(out, "  id:          {}", candidate.id);
    let _ = writeln!(out, "  institution: {}", candidate.institution);
    for (label, value) in [
        ("department", &candidate.department),
        ("position", &candidate.position),
        ("phone", &candidate.phone),
        ("orcid", &candidate.orcid),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "  {:<12} {}", format!("{label}:"), value);
        }
    }
    let _ = writeln!(
        out,
        "  submitted:   {}",
        candidate.submission_date.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "  status:      {}", badge(candidate.status));
    if let Some(score) = candidate.reviewer_score {
        let _ = writeln!(out, "  rating:      {}/5", score.get());
    }
    if let Some(notes) = &candidate.reviewer_notes {
        let _ = writeln!(out, "  notes:       {notes}");
    }

    let _ = writeln!(
        out,
        "  score:       {} over {} publications (avg {:.2})",
        candidate.total_score,
        candidate.publication_count(),
        candidate.average_publication_score()
    );
    for line in &breakdown.lines {
        let source = line.source_name.as_deref().unwrap_or("unknown source");
        let _ = write!(
            out,
            "    [{}] {} | {} ({}) {} pts",
            line.publication_id, line.title, source, line.source_id, line.stored_score
        );
        if line.is_stale() {
            let _ = write!(out, " (registry now {})", line.current_points);
        }
        out.push('\n');
    }
    if !breakdown.is_consistent() {
        let _ = writeln!(
            out,
            "  total differs from publication scores ({}) by {}",
            breakdown.publication_total, breakdown.drift
        );
    }
    out
}
