//! Publication-source registry: the prestige table consulted at scoring and export time.

pub mod domain;
mod filter;
mod registry;
mod seed;

pub use domain::{PublicationSource, SourceDraft, SourceId, SourceValidationError};
pub use filter::{CategoryFilter, SourceFilter};
pub use registry::{RegistryError, SourceLookup, SourceRegistry, SourceTable};
pub use seed::default_sources;
