use std::io::Write;

use super::record::{ExportKey, ExportRecord};
use super::ExportError;

/// Comma-separated output. The header is taken from the first record alone; later
/// records are projected onto it, so keys the first record lacks are dropped and keys
/// it has but a later record lacks are written as empty cells. Fields containing a
/// delimiter, quote, or line break are quoted.
pub fn write_csv<W: Write>(records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    let header: Vec<ExportKey> = first.keys().copied().collect();

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(header.iter().map(|key| key.name().into_owned()))?;
    for record in records {
        csv_writer.write_record(header.iter().map(|key| {
            record
                .get(key)
                .map(|value| value.to_cell())
                .unwrap_or_default()
        }))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn to_csv_string(records: &[ExportRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Indented JSON array holding every record with all of its keys.
pub fn write_json<W: Write>(records: &[ExportRecord], writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

pub fn to_json_string(records: &[ExportRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}
