pub mod candidates;
pub mod dashboard;
pub mod export;
pub mod scoring;
pub mod sources;
