mod candidates;
mod cli;
mod infra;
mod render;
mod reports;
mod sources;

use candidate_eval::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
