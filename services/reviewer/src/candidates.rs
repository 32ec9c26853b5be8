use std::path::PathBuf;

use candidate_eval::error::AppError;
use candidate_eval::workflows::candidates::{
    Candidate, CandidateId, CandidateStatus, CandidateSubmission, IntakeGuard, PublicationId,
    ReviewUpdate, ReviewerScore,
};
use candidate_eval::workflows::scoring::{self, ScoreBreakdown};
use candidate_eval::workflows::sources::SourceId;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::infra::{parse_reviewer_score, print_json, Workspace};
use crate::render;

#[derive(Subcommand, Debug)]
pub(crate) enum CandidateCommand {
    /// Validate, score and store a submission read from a JSON file
    Submit {
        /// Path to a JSON document with `personal` and `publications`
        file: PathBuf,
        /// Validate and preview scores without storing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Show one candidate with a per-publication score breakdown
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Record a reviewer decision, notes or score
    Review(ReviewArgs),
    /// Point a publication at another source and re-score it
    SetSource {
        id: String,
        publication: String,
        source: String,
    },
    /// Set the total score to the sum of the stored publication scores
    Reconcile { id: String },
    /// Remove a candidate
    Delete { id: String },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReviewArgs {
    pub(crate) id: String,
    /// New status: pending, approved, rejected or flagged
    #[arg(long)]
    pub(crate) status: Option<CandidateStatus>,
    /// Replace reviewer notes
    #[arg(long, conflicts_with = "clear_notes")]
    pub(crate) notes: Option<String>,
    #[arg(long)]
    pub(crate) clear_notes: bool,
    /// Reviewer rating from 1 to 5
    #[arg(long, value_parser = parse_reviewer_score, conflicts_with = "clear_score")]
    pub(crate) score: Option<ReviewerScore>,
    #[arg(long)]
    pub(crate) clear_score: bool,
}

impl ReviewArgs {
    pub(crate) fn update(&self) -> ReviewUpdate {
        let reviewer_notes = if self.clear_notes {
            Some(String::new())
        } else {
            self.notes.clone()
        };
        let reviewer_score = if self.clear_score {
            Some(None)
        } else {
            self.score.map(Some)
        };
        ReviewUpdate {
            status: self.status,
            reviewer_notes,
            reviewer_score,
        }
    }
}

#[derive(Serialize)]
struct CandidateView<'a> {
    candidate: &'a Candidate,
    breakdown: &'a ScoreBreakdown,
}

pub(crate) fn run(command: CandidateCommand, workspace: &Workspace) -> Result<(), AppError> {
    match command {
        CandidateCommand::Submit { file, dry_run } => submit(file, dry_run, workspace),
        CandidateCommand::Show { id, json } => {
            let registry = workspace.registry()?;
            let service = workspace.candidates()?;
            let id = CandidateId::from(id.as_str());
            let candidate = service.get(&id)?;
            let breakdown = service.breakdown(&id, &registry)?;
            if json {
                return print_json(&CandidateView {
                    candidate: &candidate,
                    breakdown: &breakdown,
                });
            }
            print!("{}", render::candidate_details(&candidate, &breakdown));
            Ok(())
        }
        CandidateCommand::Review(args) => {
            let update = args.update();
            if update.is_empty() {
                println!("nothing to update");
                return Ok(());
            }
            let service = workspace.candidates()?;
            let candidate =
                service.review(&CandidateId::from(args.id.as_str()), update)?;
            println!("{}", render::candidate_row(&candidate));
            Ok(())
        }
        CandidateCommand::SetSource {
            id,
            publication,
            source,
        } => {
            let registry = workspace.registry()?;
            let service = workspace.candidates()?;
            let change = service.reassign_publication_source(
                &CandidateId::from(id.as_str()),
                &PublicationId::from(publication.as_str()),
                SourceId::new(source),
                &registry,
            )?;
            println!(
                "publication {}: {} ({} pts) -> {} ({} pts)",
                change.publication_id,
                change.previous_source,
                change.previous_score,
                change.source,
                change.score
            );
            if change.drift != 0 {
                println!(
                    "total score {} differs from publication scores by {}; run `candidates reconcile {id}` to update it",
                    change.total_score, change.drift
                );
            }
            Ok(())
        }
        CandidateCommand::Reconcile { id } => {
            let service = workspace.candidates()?;
            let reconciliation = service.reconcile_total(&CandidateId::from(id.as_str()))?;
            if reconciliation.changed() {
                println!(
                    "total score {} -> {}",
                    reconciliation.previous_total, reconciliation.total_score
                );
            } else {
                println!("total score {} already matches", reconciliation.total_score);
            }
            Ok(())
        }
        CandidateCommand::Delete { id } => {
            let service = workspace.candidates()?;
            service.delete(&CandidateId::from(id.as_str()))?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

fn submit(file: PathBuf, dry_run: bool, workspace: &Workspace) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&file)?;
    let submission: CandidateSubmission = serde_json::from_str(&raw)?;
    let registry = workspace.registry()?;

    if dry_run {
        IntakeGuard.check(&submission)?;
        let mut total: u64 = 0;
        for (offset, publication) in submission.publications.iter().enumerate() {
            let points = scoring::score_for_source(&publication.source, &registry);
            total += u64::from(points);
            println!(
                "{:>2}. {} [{}] {} pts",
                offset + 1,
                publication.title,
                publication.source,
                points
            );
        }
        println!("submission is valid; total score would be {total}");
        return Ok(());
    }

    let service = workspace.candidates()?;
    let candidate = service.submit(submission, &registry)?;
    println!("submitted {}", render::candidate_row(&candidate));
    Ok(())
}
