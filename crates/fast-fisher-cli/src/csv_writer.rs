//! CSV output of per-table results.
//!
//! One output row per input table, in input order. Values are written with
//! full round-trip precision; a NaN odds ratio is written as `NaN` and an
//! infinite one as `inf`.

use crate::csv_parser::IdColumn;
use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Output destination: either stdout or a file.
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Destination for an optional `-o` path.
    pub fn from_path(path: Option<&str>) -> Self {
        path.map_or(OutputDest::Stdout, |p| OutputDest::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            OutputDest::Stdout => Ok(Box::new(io::stdout().lock())),
            OutputDest::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Formats one value for output.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

/// Writes named columns, preceded by the identifier column when present.
///
/// Every column must have one value per table.
pub fn write_columns(
    ids: Option<&IdColumn>,
    columns: &[(&str, &[f64])],
    dest: &OutputDest,
) -> Result<()> {
    let writer = dest.writer()?;
    write_columns_to(writer, ids, columns)
}

/// [`write_columns`] into any writer.
pub fn write_columns_to<W: Write>(
    writer: W,
    ids: Option<&IdColumn>,
    columns: &[(&str, &[f64])],
) -> Result<()> {
    let rows = columns.first().map_or(0, |(_, values)| values.len());
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if let Some(ids) = ids {
        header.push(&ids.header);
    }
    header.extend(columns.iter().map(|(name, _)| *name));
    csv_writer.write_record(&header)?;

    let mut record: Vec<String> = Vec::with_capacity(header.len());
    for row in 0..rows {
        record.clear();
        if let Some(ids) = ids {
            record.push(ids.values.get(row).cloned().unwrap_or_default());
        }
        record.extend(columns.iter().map(|(_, values)| format_value(values[row])));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
