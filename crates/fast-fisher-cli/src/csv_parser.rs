//! CSV input: one 2x2 table per row.
//!
//! # Column Detection
//!
//! The first row is a header when any of its first four fields is not an
//! integer. Count columns are then located by the names `a`, `b`, `c`, `d`
//! (case-insensitive). A header without all four names falls back to the
//! first four columns that are not an identifier column. A headerless file
//! uses columns 0..4 directly.
//!
//! A column headed `id`, `name` or `label` is carried through to the output
//! unchanged.
//!
//! ```text
//! id,a,b,c,d
//! gene1,8,2,1,5
//! gene2,3,5,4,50
//! ```

use crate::error::{CliError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Cell names in column order.
const CELL_NAMES: [&str; 4] = ["a", "b", "c", "d"];

/// An identifier column carried through to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdColumn {
    /// Header as written in the input file.
    pub header: String,
    /// One value per table.
    pub values: Vec<String>,
}

/// Tables parsed from a CSV file, as four parallel count columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableColumns {
    /// Top-left cells.
    pub a: Vec<u64>,
    /// Top-right cells.
    pub b: Vec<u64>,
    /// Bottom-left cells.
    pub c: Vec<u64>,
    /// Bottom-right cells.
    pub d: Vec<u64>,
    /// Identifier column, if the input has one.
    pub ids: Option<IdColumn>,
    /// Source line of each table, 1-based.
    pub lines: Vec<usize>,
}

impl TableColumns {
    /// Number of tables.
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns `true` if no table was parsed.
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Attaches the CSV location to an engine error.
    ///
    /// A rejection that names a table index becomes
    /// [`CliError::TableRejected`] with that table's line and id.
    pub fn locate(&self, err: fast_fisher::Error) -> CliError {
        let index = match &err {
            fast_fisher::Error::InvalidMargins { index: Some(i), .. } => *i,
            _ => return err.into(),
        };
        CliError::TableRejected {
            line: self.lines.get(index).copied(),
            id: self
                .ids
                .as_ref()
                .and_then(|ids| ids.values.get(index).cloned()),
            source: err,
        }
    }

    fn push(&mut self, counts: [u64; 4], line: usize) {
        self.lines.push(line);
        self.a.push(counts[0]);
        self.b.push(counts[1]);
        self.c.push(counts[2]);
        self.d.push(counts[3]);
    }
}

/// Where each value lives in a row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    counts: [usize; 4],
    id: Option<(usize, String)>,
}

impl Layout {
    const POSITIONAL: Self = Self {
        counts: [0, 1, 2, 3],
        id: None,
    };

    fn from_header(header: &StringRecord) -> Result<Self> {
        let names: Vec<String> = header.iter().map(normalize_header).collect();
        let id = names
            .iter()
            .position(|name| is_id_column(name))
            .and_then(|idx| header.get(idx).map(|h| (idx, h.trim().to_string())));

        let by_name: Vec<Option<usize>> = CELL_NAMES
            .iter()
            .map(|cell| names.iter().position(|name| name == cell))
            .collect();
        if let [Some(a), Some(b), Some(c), Some(d)] = by_name[..] {
            return Ok(Self {
                counts: [a, b, c, d],
                id,
            });
        }

        let id_idx = id.as_ref().map(|(idx, _)| *idx);
        let positional: Vec<usize> = (0..names.len()).filter(|&idx| Some(idx) != id_idx).take(4).collect();
        match positional[..] {
            [a, b, c, d] => Ok(Self {
                counts: [a, b, c, d],
                id,
            }),
            _ => Err(CliError::CsvParseError {
                message: format!(
                    "expected four count columns, found {}",
                    positional.len()
                ),
                line: Some(1),
            }),
        }
    }

    fn extract(&self, record: &StringRecord, line: usize) -> Result<[u64; 4]> {
        let mut counts = [0_u64; 4];
        for (slot, (&idx, name)) in counts.iter_mut().zip(self.counts.iter().zip(CELL_NAMES)) {
            let value = record.get(idx).ok_or_else(|| CliError::CsvParseError {
                message: format!("missing column '{name}'"),
                line: Some(line),
            })?;
            *slot = parse_count(value).map_err(|message| CliError::CsvParseError {
                message,
                line: Some(line),
            })?;
        }
        Ok(counts)
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

fn is_id_column(normalized: &str) -> bool {
    matches!(normalized, "id" | "name" | "label")
}

fn parse_count(value: &str) -> std::result::Result<u64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty count".to_string());
    }
    trimmed.parse::<u64>().map_err(|_| {
        if trimmed.starts_with('-') {
            format!("negative count '{trimmed}'")
        } else {
            format!("invalid count '{trimmed}'")
        }
    })
}

fn looks_like_header(record: &StringRecord) -> bool {
    record
        .iter()
        .take(4)
        .any(|field| field.trim().parse::<u64>().is_err())
}

/// Parse a CSV file of tables.
pub fn parse_tables<P: AsRef<Path>>(path: P) -> Result<TableColumns> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    parse_tables_from_reader(BufReader::new(file))
}

/// Parse tables from any reader.
pub fn parse_tables_from_reader<R: Read>(reader: R) -> Result<TableColumns> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let Some(first) = records.next() else {
        return Err(CliError::CsvParseError {
            message: "CSV file is empty".to_string(),
            line: None,
        });
    };
    let first = first?;

    let mut tables = TableColumns::default();
    let layout = if looks_like_header(&first) {
        Layout::from_header(&first)?
    } else {
        tables.push(Layout::POSITIONAL.extract(&first, 1)?, 1);
        Layout::POSITIONAL
    };
    let mut ids = layout.id.as_ref().map(|(_, header)| IdColumn {
        header: header.clone(),
        values: Vec::new(),
    });

    for (row, result) in records.enumerate() {
        let line = row + 2;
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;
        tables.push(layout.extract(&record, line)?, line);
        if let (Some(ids), Some((idx, _))) = (ids.as_mut(), layout.id.as_ref()) {
            ids.values.push(record.get(*idx).unwrap_or("").to_string());
        }
    }

    tables.ids = ids;
    tracing::debug!(tables = tables.len(), "parsed input");
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<TableColumns> {
        parse_tables_from_reader(text.as_bytes())
    }

    #[test]
    fn test_named_columns() {
        let tables = parse("a,b,c,d\n8,2,1,5\n3,5,4,50\n").unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables.a, vec![8, 3]);
        assert_eq!(tables.d, vec![5, 50]);
        assert!(tables.ids.is_none());
    }

    #[test]
    fn test_named_columns_any_order_and_case() {
        let tables = parse("D,C,B,A\n1,2,3,4\n").unwrap();
        assert_eq!(
            (tables.a[0], tables.b[0], tables.c[0], tables.d[0]),
            (4, 3, 2, 1)
        );
    }

    #[test]
    fn test_headerless_uses_first_four_columns() {
        let tables = parse("1,2,1,5\n3,5,4,50\n").unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables.b, vec![2, 5]);
        assert!(tables.ids.is_none());
    }

    #[test]
    fn test_unnamed_header_falls_back_to_position() {
        let tables = parse("x1,x2,x3,x4\n1,2,3,4\n").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.c, vec![3]);
    }

    #[test]
    fn test_id_column_is_carried() {
        let tables = parse("Gene,a,b,c,d\nTP53,8,2,1,5\n").unwrap();
        assert!(tables.ids.is_none());

        let tables = parse("Name,a,b,c,d\nTP53,8,2,1,5\nBRCA1,3,5,4,50\n").unwrap();
        let ids = tables.ids.unwrap();
        assert_eq!(ids.header, "Name");
        assert_eq!(ids.values, vec!["TP53", "BRCA1"]);
    }

    #[test]
    fn test_id_column_skipped_by_position() {
        let tables = parse("label,n11,n12,n21,n22\nx,1,2,3,4\n").unwrap();
        assert_eq!(tables.a, vec![1]);
        assert_eq!(tables.d, vec![4]);
        assert_eq!(tables.ids.unwrap().values, vec!["x"]);
    }

    #[test]
    fn test_whitespace_in_values() {
        let tables = parse("a, b ,c,d\n 1 , 2,3 ,4\n").unwrap();
        assert_eq!(tables.b, vec![2]);
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let tables = parse("a,b,c,d\n").unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn test_error_empty_file() {
        assert!(matches!(
            parse(""),
            Err(CliError::CsvParseError { line: None, .. })
        ));
    }

    #[test]
    fn test_error_negative_count() {
        match parse("a,b,c,d\n1,2,3,4\n1,-2,3,4\n") {
            Err(CliError::CsvParseError { message, line }) => {
                assert_eq!(line, Some(3));
                assert!(message.contains("negative count '-2'"));
            }
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_invalid_and_missing_values() {
        match parse("a,b,c,d\n1,2,x,4\n") {
            Err(CliError::CsvParseError { message, line }) => {
                assert_eq!(line, Some(2));
                assert!(message.contains("invalid count 'x'"));
            }
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
        match parse("a,b,c,d\n1,2,3\n") {
            Err(CliError::CsvParseError { message, .. }) => {
                assert!(message.contains("missing column 'd'"));
            }
            other => panic!("Expected CsvParseError, got {other:?}"),
        }
        assert!(parse("a,b,c,d\n1,2,,4\n").is_err());
    }

    #[test]
    fn test_error_too_few_columns() {
        assert!(matches!(
            parse("id,x,y\nq,1,2\n"),
            Err(CliError::CsvParseError { line: Some(1), .. })
        ));
    }

    #[test]
    fn test_error_file_not_found() {
        match parse_tables("/nonexistent/tables.csv") {
            Err(CliError::IoError { path, .. }) => {
                assert_eq!(path.as_deref(), Some("/nonexistent/tables.csv"));
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn test_lines_are_recorded() {
        let tables = parse("a,b,c,d\n1,2,3,4\n5,6,7,8\n").unwrap();
        assert_eq!(tables.lines, vec![2, 3]);

        let tables = parse("1,2,3,4\n5,6,7,8\n").unwrap();
        assert_eq!(tables.lines, vec![1, 2]);
    }

    #[test]
    fn test_locate_overflowing_table() {
        let text = format!("id,a,b,c,d\nsmall,1,2,3,4\nbig,{},1,0,0\n", u64::MAX);
        let tables = parse(&text).unwrap();
        let err = fast_fisher::exact(&tables.a, &tables.b, &tables.c, &tables.d, "less").unwrap_err();

        match tables.locate(err) {
            CliError::TableRejected { line, id, source } => {
                assert_eq!(line, Some(3));
                assert_eq!(id.as_deref(), Some("big"));
                assert!(matches!(
                    source,
                    fast_fisher::Error::InvalidMargins { index: Some(1), .. }
                ));
            }
            other => panic!("Expected TableRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_locate_passes_other_errors_through() {
        let tables = parse("a,b,c,d\n1,2,3,4\n").unwrap();
        let err = fast_fisher::Error::InvalidAlternative {
            value: "up".to_string(),
        };
        assert!(matches!(tables.locate(err), CliError::EngineError { .. }));
    }

    #[test]
    fn test_large_counts() {
        let tables = parse(&format!("{m},0,0,0\n", m = u64::MAX)).unwrap();
        assert_eq!(tables.a, vec![u64::MAX]);
    }
}
