//! Gradebook error types.
//!
//! Every store and engine operation returns these to the immediate caller.
//! Nothing is retried and nothing is swallowed: an empty query result means
//! "no records", never "the read failed".

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the grade store and the GPA engine.
#[derive(Debug, Error)]
pub enum GradebookError {
    /// Caller input failed validation; nothing was written.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A raw score outside [0, 100] was handed to the GPA engine.
    #[error("score {0} is outside the grading scale (0-100)")]
    Domain(i64),

    /// The backing file could not be opened, created or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer failed on the file as a whole.
    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not name a column every record needs.
    #[error("malformed header in {}: missing column `{missing}`", .path.display())]
    MalformedHeader { path: PathBuf, missing: String },
}

impl GradebookError {
    /// Returns `true` if the store was left untouched because the input was bad.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            GradebookError::Validation(_) | GradebookError::Domain(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GradebookError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        GradebookError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, GradebookError>;
