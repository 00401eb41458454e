//! Error types for notes parsing, merging and enrichment.

use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::analyzer::AnalyzerError;

/// Errors that can occur while reading, merging or writing notes.
#[derive(Error, Debug)]
pub enum NotesError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No daily entry for {0}")]
    UnknownDate(NaiveDate),

    #[error("Meal section '{meal}' not found in the entry for {date}")]
    MealNotFound { date: NaiveDate, meal: String },

    /// The breakdown document was edited into a shape the tool never writes.
    #[error("Malformed breakdown document for {date}: {message}")]
    Structure { date: NaiveDate, message: String },

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
}

impl NotesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NotesError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn structure(date: NaiveDate, message: impl Into<String>) -> Self {
        NotesError::Structure {
            date,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_message() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let err = NotesError::structure(date, "daily table without anchor");
        assert_eq!(
            err.to_string(),
            "Malformed breakdown document for 2025-07-01: daily table without anchor"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = NotesError::io(
            "/tmp/missing.md",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/missing.md"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
