//! Reviewer dashboard: filtered and ordered candidate listings plus headline counts.

pub mod query;
pub mod stats;

pub use query::{DashboardQuery, SortDirection, SortField, StatusFilter};
pub use stats::DashboardStats;
