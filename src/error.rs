//! Error types shared by the parsers, the number helpers and the day runner.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Input did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, found {input:?}")]
    Mismatch { expected: String, input: String },

    #[error("expected {expected} pieces, found {found} in {input:?}")]
    Count {
        expected: usize,
        found: usize,
        input: String,
    },

    #[error("duplicate key {key:?}")]
    DuplicateKey { key: String },

    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("grid is not rectangular: row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line} is not valid UTF-8")]
    Utf8 { line: usize },

    #[error("expected {expected}, found empty input")]
    Empty { expected: String },
}

impl ParseError {
    pub fn mismatch(expected: impl Into<String>, input: &str) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            input: input.to_owned(),
        }
    }

    pub fn count(expected: usize, found: usize, input: &str) -> Self {
        Self::Count {
            expected,
            found,
            input: input.to_owned(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("division by zero")]
    DivideByZero,

    #[error("{0}")]
    Domain(String),
}

impl Error {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }
}
