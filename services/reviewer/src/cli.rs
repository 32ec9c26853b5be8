use std::path::PathBuf;

use candidate_eval::config::AppConfig;
use candidate_eval::error::AppError;
use candidate_eval::telemetry;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::candidates::{self, CandidateCommand};
use crate::infra::Workspace;
use crate::reports::{self, DashboardArgs, ExportArgs};
use crate::sources::{self, SourceCommand};

#[derive(Parser, Debug)]
#[command(
    name = "candidate-eval",
    about = "Score, review and export academic candidate submissions",
    version
)]
pub(crate) struct Cli {
    /// Directory holding the persisted collections (overrides APP_DATA_DIR)
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Manage the publication-source prestige table
    Sources {
        #[command(subcommand)]
        command: SourceCommand,
    },
    /// Submit, inspect and review candidates
    Candidates {
        #[command(subcommand)]
        command: CandidateCommand,
    },
    /// List candidates with search, status filter and sorting
    Dashboard(DashboardArgs),
    /// Write candidates_export.csv or candidates_export.json
    Export(ExportArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;
    info!(
        environment = config.environment.label(),
        data_dir = %config.storage.data_dir.display(),
        "candidate evaluation tool ready"
    );

    dispatch(cli.command, &Workspace::from_config(&config))
}

pub(crate) fn dispatch(command: Command, workspace: &Workspace) -> Result<(), AppError> {
    match command {
        Command::Sources { command } => sources::run(command, workspace),
        Command::Candidates { command } => candidates::run(command, workspace),
        Command::Dashboard(args) => reports::run_dashboard(args, workspace),
        Command::Export(args) => reports::run_export(args, workspace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candidate_eval::workflows::candidates::CandidateStatus;
    use candidate_eval::workflows::dashboard::{SortDirection, SortField, StatusFilter};
    use candidate_eval::workflows::export::ExportFormat;

    #[test]
    fn data_dir_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["candidate-eval", "sources", "list", "--data-dir", "/tmp/x"])
            .expect("arguments parse");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Command::Sources {
                command: SourceCommand::List { .. }
            }
        ));
    }

    #[test]
    fn dashboard_defaults_to_newest_first() {
        let cli = Cli::try_parse_from(["candidate-eval", "dashboard"]).expect("arguments parse");
        let Command::Dashboard(args) = cli.command else {
            panic!("expected dashboard command");
        };
        let query = args.query.to_query();
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.sort_field, SortField::SubmissionDate);
        assert_eq!(query.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn export_flags_toggle_field_groups() {
        let cli = Cli::try_parse_from([
            "candidate-eval",
            "export",
            "--format",
            "json",
            "--no-publications",
            "--reviewer-notes",
            "--status",
            "approved",
        ])
        .expect("arguments parse");
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.format, ExportFormat::Json);
        let options = args.options();
        assert!(options.personal_info);
        assert!(!options.publications);
        assert!(options.scoring);
        assert!(options.reviewer_notes);
        assert_eq!(
            args.query.to_query().status,
            StatusFilter::Only(CandidateStatus::Approved)
        );
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        assert!(Cli::try_parse_from(["candidate-eval", "dashboard", "--sort", "email"]).is_err());
    }
}
