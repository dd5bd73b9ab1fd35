//! Errors reported by the `fast-fisher` binary.
//!
//! `Display` gives the one-line failure; [`CliError::hint`] gives the
//! follow-up advice `main` prints under it.
//!
//! ```text
//! error: line 3 (id 'big'): invalid margins at index 1: table total overflows u64
//! hint: cell counts of one table must sum to at most 18446744073709551615
//! ```

use std::fmt;
use std::io;

/// Every failure the CLI can report.
#[derive(Debug)]
pub enum CliError {
    /// Reading the input or writing the output failed.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// The input CSV could not be turned into tables.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// 1-based line number, if known.
        line: Option<usize>,
    },
    /// The engine rejected one table of the batch.
    TableRejected {
        /// 1-based input line of the table.
        line: Option<usize>,
        /// Value of the table's id column, if the input has one.
        id: Option<String>,
        /// The engine error, carrying the batch index.
        source: fast_fisher::Error,
    },
    /// The engine rejected the batch or the configuration as a whole.
    EngineError {
        /// The underlying fast-fisher error.
        source: fast_fisher::Error,
    },
    /// A command-line value is out of range.
    InvalidArgument {
        /// Flag name without leading dashes.
        argument: String,
        /// Why the value was rejected.
        reason: String,
        /// Valid values, if there is a short list of them.
        suggestion: Option<String>,
    },
}

impl CliError {
    /// Advice for fixing the problem, if there is any beyond the message.
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::IoError { path: Some(_), .. } => {
                Some("check that the file exists and is readable or writable".to_string())
            }
            CliError::IoError { path: None, .. } | CliError::EngineError { .. } => None,
            CliError::CsvParseError { .. } => Some(
                "each row needs four non-negative integer counts in columns a, b, c, d".to_string(),
            ),
            CliError::TableRejected { .. } => Some(format!(
                "cell counts of one table must sum to at most {}",
                u64::MAX
            )),
            CliError::InvalidArgument { suggestion, .. } => suggestion.clone(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError {
                source,
                path: Some(path),
            } => write!(f, "cannot access '{path}': {source}"),
            CliError::IoError { source, path: None } => write!(f, "I/O error: {source}"),
            CliError::CsvParseError {
                message,
                line: Some(line),
            } => write!(f, "line {line}: {message}"),
            CliError::CsvParseError {
                message,
                line: None,
            } => write!(f, "{message}"),
            CliError::TableRejected { line, id, source } => {
                match line {
                    Some(line) => write!(f, "line {line}")?,
                    None => f.write_str("table")?,
                }
                if let Some(id) = id {
                    write!(f, " (id '{id}')")?;
                }
                write!(f, ": {source}")
            }
            CliError::EngineError { source } => write!(f, "{source}"),
            CliError::InvalidArgument {
                argument, reason, ..
            } => write!(f, "invalid value for --{argument}: {reason}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::IoError { source, .. } => Some(source),
            CliError::TableRejected { source, .. } | CliError::EngineError { source } => {
                Some(source)
            }
            CliError::CsvParseError { .. } | CliError::InvalidArgument { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<fast_fisher::Error> for CliError {
    fn from(err: fast_fisher::Error) -> Self {
        CliError::EngineError { source: err }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .and_then(|p| usize::try_from(p.line()).ok());
        CliError::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn overflow(index: usize) -> fast_fisher::Error {
        fast_fisher::Error::InvalidMargins {
            index: Some(index),
            reason: "table total overflows u64",
        }
    }

    #[test]
    fn test_io_error_names_path() {
        let err = CliError::IoError {
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            path: Some("/path/to/tables.csv".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "cannot access '/path/to/tables.csv': file not found"
        );
        assert!(err.hint().is_some());

        let err: CliError = io::Error::other("broken pipe").into();
        assert_eq!(err.to_string(), "I/O error: broken pipe");
        assert!(err.hint().is_none());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_csv_error_with_and_without_line() {
        let err = CliError::CsvParseError {
            message: "invalid count 'x'".to_string(),
            line: Some(7),
        };
        assert_eq!(err.to_string(), "line 7: invalid count 'x'");
        assert!(err.hint().unwrap().contains("non-negative integer"));

        let err = CliError::CsvParseError {
            message: "CSV file is empty".to_string(),
            line: None,
        };
        assert_eq!(err.to_string(), "CSV file is empty");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_table_rejected_points_at_row() {
        let err = CliError::TableRejected {
            line: Some(3),
            id: Some("big".to_string()),
            source: overflow(1),
        };
        let display = err.to_string();
        assert!(display.starts_with("line 3 (id 'big'): invalid margins at index 1"));
        assert!(err.hint().unwrap().contains(&u64::MAX.to_string()));
        assert!(err.source().is_some());

        let err = CliError::TableRejected {
            line: None,
            id: None,
            source: overflow(0),
        };
        assert!(err.to_string().starts_with("table: "));
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let source = fast_fisher::Error::InvalidAlternative {
            value: "up".to_string(),
        };
        let err: CliError = source.clone().into();
        assert_eq!(err.to_string(), source.to_string());
        assert!(err.hint().is_none());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_argument_hint_is_suggestion() {
        let err = CliError::InvalidArgument {
            argument: "alternative".to_string(),
            reason: "unknown alternative 'up'".to_string(),
            suggestion: Some("use one of: less, greater, two-sided".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for --alternative: unknown alternative 'up'"
        );
        assert_eq!(
            err.hint().as_deref(),
            Some("use one of: less, greater, two-sided")
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_csv_error() {
        let result: std::result::Result<csv::StringRecord, csv::Error> = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\n1,\"unterminated".as_bytes())
            .records()
            .last()
            .unwrap();

        if let Err(csv_err) = result {
            let cli_err: CliError = csv_err.into();
            assert!(matches!(cli_err, CliError::CsvParseError { .. }));
        }
    }
}
