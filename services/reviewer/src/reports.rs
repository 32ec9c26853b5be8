use std::path::PathBuf;

use candidate_eval::error::AppError;
use candidate_eval::workflows::candidates::Candidate;
use candidate_eval::workflows::dashboard::{
    DashboardQuery, DashboardStats, SortDirection, SortField, StatusFilter,
};
use candidate_eval::workflows::export::{write_export, ExportFormat, ExportOptions};
use clap::Args;
use serde::Serialize;

use crate::infra::{print_json, Workspace};
use crate::render;

#[derive(Args, Debug, Clone)]
pub(crate) struct QueryArgs {
    /// Case-insensitive match on name, email or institution
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// all, pending, approved, rejected or flagged
    #[arg(long, default_value = "all")]
    pub(crate) status: StatusFilter,
    /// name, institution, submissionDate, totalScore or status
    #[arg(long, default_value = "submissionDate")]
    pub(crate) sort: SortField,
    /// asc or desc
    #[arg(long, default_value = "desc")]
    pub(crate) direction: SortDirection,
}

impl QueryArgs {
    pub(crate) fn to_query(&self) -> DashboardQuery {
        DashboardQuery::default()
            .search(self.search.clone())
            .status(self.status)
            .sort(self.sort, self.direction)
    }
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    #[command(flatten)]
    pub(crate) query: QueryArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[arg(long, default_value = "csv")]
    pub(crate) format: ExportFormat,
    /// Output directory (overrides APP_EXPORT_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[arg(long)]
    pub(crate) no_personal_info: bool,
    #[arg(long)]
    pub(crate) no_publications: bool,
    #[arg(long)]
    pub(crate) no_scoring: bool,
    /// Include reviewer notes and score
    #[arg(long)]
    pub(crate) reviewer_notes: bool,
    #[command(flatten)]
    pub(crate) query: QueryArgs,
}

impl ExportArgs {
    pub(crate) fn options(&self) -> ExportOptions {
        ExportOptions {
            personal_info: !self.no_personal_info,
            publications: !self.no_publications,
            scoring: !self.no_scoring,
            reviewer_notes: self.reviewer_notes,
        }
    }
}

#[derive(Serialize)]
struct DashboardView<'a> {
    stats: DashboardStats,
    candidates: &'a [&'a Candidate],
}

pub(crate) fn run_dashboard(args: DashboardArgs, workspace: &Workspace) -> Result<(), AppError> {
    let candidates = workspace.candidates()?.list()?;
    let stats = DashboardStats::collect(&candidates);
    let rows = args.query.to_query().apply(&candidates);

    if args.json {
        return print_json(&DashboardView {
            stats,
            candidates: &rows,
        });
    }

    println!("{}", render::stats_line(&stats));
    println!("{}", render::candidate_header());
    for candidate in &rows {
        println!("{}", render::candidate_row(candidate));
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs, workspace: &Workspace) -> Result<(), AppError> {
    let registry = workspace.registry()?;
    let candidates = workspace.candidates()?.list()?;
    let rows = args.query.to_query().apply(&candidates);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| workspace.export_dir.clone());

    let path = write_export(
        &output,
        args.format,
        rows.iter().copied(),
        args.options(),
        &registry,
    )?;
    println!("exported {} candidates to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candidate_eval::workflows::candidates::{CandidateStatus, CandidateSubmission};

    fn workspace(dir: &tempfile::TempDir) -> Workspace {
        Workspace {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().join("out"),
        }
    }

    fn seed(workspace: &Workspace) {
        let registry = workspace.registry().expect("registry opens");
        let service = workspace.candidates().expect("service opens");
        for (name, source) in [("Ada Byron", "1"), ("Alan Turing", "35")] {
            let submission: CandidateSubmission = serde_json::from_value(serde_json::json!({
                "personal": {
                    "name": name,
                    "email": "someone@example.edu",
                    "institution": "Example"
                },
                "publications": [
                    { "title": "Paper", "source": source, "publicationDate": "2024-01-01" }
                ]
            }))
            .expect("submission decodes");
            service.submit(submission, &registry).expect("submitted");
        }
    }

    fn query() -> QueryArgs {
        QueryArgs {
            search: String::new(),
            status: StatusFilter::All,
            sort: SortField::TotalScore,
            direction: SortDirection::Asc,
        }
    }

    #[test]
    fn export_writes_into_the_configured_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = workspace(&dir);
        seed(&workspace);

        run_export(
            ExportArgs {
                format: ExportFormat::Csv,
                output: None,
                no_personal_info: false,
                no_publications: false,
                no_scoring: false,
                reviewer_notes: false,
                query: query(),
            },
            &workspace,
        )
        .expect("export succeeds");

        let csv = std::fs::read_to_string(dir.path().join("out").join("candidates_export.csv"))
            .expect("export readable");
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("Alan Turing"));
        assert!(rows[2].contains("Ada Byron"));
    }

    #[test]
    fn export_respects_the_status_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = workspace(&dir);
        seed(&workspace);

        run_export(
            ExportArgs {
                format: ExportFormat::Json,
                output: Some(dir.path().join("custom")),
                no_personal_info: false,
                no_publications: true,
                no_scoring: false,
                reviewer_notes: false,
                query: QueryArgs {
                    status: StatusFilter::Only(CandidateStatus::Approved),
                    ..query()
                },
            },
            &workspace,
        )
        .expect("export succeeds");

        let json = std::fs::read_to_string(dir.path().join("custom").join("candidates_export.json"))
            .expect("export readable");
        assert_eq!(json, "[]");
    }

    #[test]
    fn dashboard_runs_against_an_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        run_dashboard(
            DashboardArgs {
                query: query(),
                json: true,
            },
            &workspace(&dir),
        )
        .expect("dashboard renders");
    }
}
