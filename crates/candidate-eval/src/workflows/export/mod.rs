//! Flattened candidate exports in tabular (CSV) and structured (JSON) form.

mod encode;
mod record;


use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::info;

use crate::workflows::candidates::{Candidate, UnknownVariant};
use crate::workflows::sources::SourceLookup;

pub use encode::{to_csv_string, to_json_string, write_csv, write_json};
pub use record::{
    ExportKey, ExportOptions, ExportRecord, ExportValue, PublicationField, RecordBuilder,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "candidates_export.csv",
            ExportFormat::Json => "candidates_export.json",
        }
    }

    pub fn encode<W: Write>(self, records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
        match self {
            ExportFormat::Csv => write_csv(records, writer),
            ExportFormat::Json => write_json(records, writer),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(UnknownVariant::new("export format", value)),
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    Json(serde_json::Error),
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => {
                write!(f, "failed to write export to {}: {}", path.display(), source)
            }
            ExportError::Csv(err) => write!(f, "failed to encode CSV export: {}", err),
            ExportError::Json(err) => write!(f, "failed to encode JSON export: {}", err),
            ExportError::Utf8(err) => write!(f, "export produced invalid UTF-8: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::Csv(err) => Some(err),
            ExportError::Json(err) => Some(err),
            ExportError::Utf8(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Utf8(err)
    }
}

/// Flatten `candidates` in their given order.
pub fn build_records<'c, I, L>(
    candidates: I,
    options: ExportOptions,
    registry: &L,
) -> Vec<ExportRecord>
where
    I: IntoIterator<Item = &'c Candidate>,
    L: SourceLookup + ?Sized,
{
    RecordBuilder::new(options, registry).build_all(candidates)
}

/// Write `candidates_export.<format>` into `dir`, replacing any previous export, and
/// return its path. The records are encoded into a staging file that is renamed over the
/// target only once it is complete, so a failed export leaves the previous file intact.
pub fn write_export<'c, I, L>(
    dir: &Path,
    format: ExportFormat,
    candidates: I,
    options: ExportOptions,
    registry: &L,
) -> Result<PathBuf, ExportError>
where
    I: IntoIterator<Item = &'c Candidate>,
    L: SourceLookup + ?Sized,
{
    let records = build_records(candidates, options, registry);
    let path = dir.join(format.file_name());

    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let staging = staging_path(dir, format);
    if let Err(err) = encode_to_file(&staging, format, &records) {
        let _ = fs::remove_file(&staging);
        return Err(err);
    }
    fs::rename(&staging, &path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        ExportError::Io {
            path: path.clone(),
            source,
        }
    })?;

    info!(
        path = %path.display(),
        format = %format,
        records = records.len(),
        "candidate export written"
    );
    Ok(path)
}

fn staging_path(dir: &Path, format: ExportFormat) -> PathBuf {
    dir.join(format!(".{}.tmp-{}", format.file_name(), std::process::id()))
}

fn encode_to_file(
    path: &Path,
    format: ExportFormat,
    records: &[ExportRecord],
) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    format.encode(records, &mut writer)?;
    writer.flush().map_err(io_error)?;
    let file = writer
        .into_inner()
        .map_err(|err| io_error(err.into_error()))?;
    file.sync_all().map_err(io_error)
}
