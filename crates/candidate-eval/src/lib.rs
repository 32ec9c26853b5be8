//! Evaluation and query engine for academic candidate submissions.
//!
//! Candidates submit personal data and a publication list. Each publication is scored
//! against a configurable prestige table (the source registry), and reviewers browse,
//! filter, sort, edit and export the resulting records.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;
pub use error::AppError;
