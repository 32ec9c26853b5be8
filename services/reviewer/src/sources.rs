use candidate_eval::error::AppError;
use candidate_eval::workflows::sources::{CategoryFilter, SourceDraft, SourceFilter, SourceId};
use clap::Subcommand;

use crate::infra::{print_json, Workspace};
use crate::render;

#[derive(Subcommand, Debug)]
pub(crate) enum SourceCommand {
    /// List sources, optionally filtered by a search term and category
    List {
        /// Case-insensitive match on name or category
        #[arg(long, default_value = "")]
        search: String,
        /// Exact category, or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show sources grouped by category
    Groups,
    /// Create a source, or replace the one with the given id
    Upsert {
        /// Existing id to replace; a new id is generated when omitted
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, allow_negative_numbers = true)]
        points: i64,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a source. Publications keep their stored scores.
    Delete { id: String },
    /// Replace the table with the built-in defaults
    Reset,
}

pub(crate) fn run(command: SourceCommand, workspace: &Workspace) -> Result<(), AppError> {
    let mut registry = workspace.registry()?;

    match command {
        SourceCommand::List {
            search,
            category,
            json,
        } => {
            let filter = SourceFilter { search, category };
            let sources = registry.filter(&filter);
            if json {
                return print_json(&sources);
            }
            println!("{} of {} sources", sources.len(), registry.list().len());
            for source in sources {
                println!("{}", render::source_line(source));
            }
        }
        SourceCommand::Groups => {
            for (category, sources) in registry.group_by_category() {
                println!("{category} ({})", sources.len());
                for source in sources {
                    println!("  {}", render::source_line(source));
                }
            }
        }
        SourceCommand::Upsert {
            id,
            name,
            category,
            points,
            description,
        } => {
            let mut draft = SourceDraft::new(name, category, points);
            if let Some(id) = id {
                draft = draft.with_id(id);
            }
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let source = registry.upsert(draft)?;
            println!("saved {}", render::source_line(&source));
        }
        SourceCommand::Delete { id } => match registry.delete(&SourceId::new(id.clone()))? {
            Some(removed) => println!("deleted {}", render::source_line(&removed)),
            None => println!("no source with id {id}"),
        },
        SourceCommand::Reset => {
            registry.reset_to_defaults()?;
            println!("restored {} default sources", registry.list().len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(dir: &tempfile::TempDir) -> Workspace {
        Workspace {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().join("out"),
        }
    }

    #[test]
    fn upsert_then_delete_round_trips_through_the_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = workspace(&dir);

        run(
            SourceCommand::Upsert {
                id: Some("rustconf".to_string()),
                name: "RustConf".to_string(),
                category: "Top Conference".to_string(),
                points: 12,
                description: None,
            },
            &workspace,
        )
        .expect("upsert succeeds");
        let registry = workspace.registry().expect("registry opens");
        assert_eq!(
            registry
                .get_by_id(&SourceId::from("rustconf"))
                .map(|source| source.points),
            Some(12)
        );

        run(
            SourceCommand::Delete {
                id: "rustconf".to_string(),
            },
            &workspace,
        )
        .expect("delete succeeds");
        let registry = workspace.registry().expect("registry opens");
        assert!(registry.get_by_id(&SourceId::from("rustconf")).is_none());
    }

    #[test]
    fn negative_points_surface_a_registry_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run(
            SourceCommand::Upsert {
                id: None,
                name: "Broken".to_string(),
                category: "Workshop".to_string(),
                points: -1,
                description: None,
            },
            &workspace(&dir),
        );
        assert!(matches!(result, Err(AppError::Registry(_))));
        assert!(!dir
            .path()
            .join("data")
            .join("publicationSources.json")
            .exists());
    }
}
