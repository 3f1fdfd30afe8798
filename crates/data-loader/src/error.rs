//! Error types for the data-loader crate.
//!
//! Two kinds of failure abort a load:
//! - the file cannot be located or read (`NotFound`, `Io`)
//! - a row carries a value that does not convert, or too many fields
//!   (`InvalidLine`)
//!
//! Rows with too few fields are not errors; the loaders skip them.

use crate::types::DataKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading one of the MovieLens tables
///
/// Every variant carries the [`DataKind`] that was being loaded so the
/// message names the failing component.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found under any of the search roots
    #[error("Failed to load {kind} data: file {} not found, tried: {tried:?}", .path.display())]
    NotFound {
        kind: DataKind,
        path: PathBuf,
        tried: Vec<PathBuf>,
    },

    /// I/O error occurred while opening or reading the file
    #[error("Failed to load {kind} data: {source}")]
    Io {
        kind: DataKind,
        #[source]
        source: std::io::Error,
    },

    /// The input ended before the header line
    #[error("Error loading {kind} data: missing header line")]
    MissingHeader { kind: DataKind },

    /// A data line couldn't be converted
    ///
    /// `line` is 1-indexed with the header counted as line 1.
    #[error("Error loading {kind} data: invalid data format in line {line}: {reason}")]
    InvalidLine {
        kind: DataKind,
        line: usize,
        reason: String,
    },
}

impl DataLoadError {
    /// The table this error was raised for
    pub fn kind(&self) -> DataKind {
        match self {
            Self::NotFound { kind, .. }
            | Self::Io { kind, .. }
            | Self::MissingHeader { kind }
            | Self::InvalidLine { kind, .. } => *kind,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_line_message_names_component_and_line() {
        let err = DataLoadError::InvalidLine {
            kind: DataKind::Ratings,
            line: 4,
            reason: "invalid rating \"abc\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Error loading ratings data"));
        assert!(msg.contains("line 4"));
        assert_eq!(err.kind(), DataKind::Ratings);
    }

    #[test]
    fn test_not_found_lists_every_attempt() {
        let err = DataLoadError::NotFound {
            kind: DataKind::Movies,
            path: PathBuf::from("movies.csv"),
            tried: vec![PathBuf::from("movies.csv"), PathBuf::from("../movies.csv")],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to load movies data"));
        assert!(msg.contains("\"movies.csv\""));
        assert!(msg.contains("\"../movies.csv\""));
    }
}
