//! Error types for the DMS core library.

use thiserror::Error;

use crate::types::RecordId;

/// Top-level error type for all DMS operations.
#[derive(Error, Debug)]
pub enum DmsError {
    /// One or more field constraints were violated.
    #[error("Invalid record: {}", join_violations(.0))]
    Invalid(Vec<Violation>),

    /// Another record already uses this id.
    #[error("Duplicate id: {0}")]
    DuplicateId(RecordId),

    /// Another record already uses this handle (compared case-insensitively).
    #[error("Duplicate handle: {handle:?} is held by id {holder}")]
    DuplicateHandle {
        /// The handle that collided.
        handle: String,
        /// Id of the record currently holding the handle.
        holder: RecordId,
    },

    /// No record with the given id exists.
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// An import line could not be turned into a record.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying stream or file failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single field-constraint violation reported by
/// [`CharacterRecord::validate`](crate::CharacterRecord::validate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `id` must be strictly positive.
    #[error("id must be > 0 (got {0})")]
    NonPositiveId(i64),
    /// `handle` must contain at least one non-whitespace character.
    #[error("handle is required")]
    BlankHandle,
    /// `wantedLevel` must be within 0..=6.
    #[error("wantedLevel must be 0..6 (got {0})")]
    WantedLevelOutOfRange(i32),
    /// `bountyCents` must not be negative.
    #[error("bountyCents must be >= 0 (got {0})")]
    NegativeBounty(i64),
    /// `reputation` must be within -100..=100.
    #[error("reputation must be -100..100 (got {0})")]
    ReputationOutOfRange(i32),
}

/// Why an import line failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than the eight required comma-separated fields.
    #[error("expected 8 fields, found {found}")]
    FieldCount {
        /// Number of fields present on the line.
        found: usize,
    },
    /// A numeric field did not hold an integer.
    #[error("{field} is not a valid integer: {value:?}")]
    InvalidNumber {
        /// Column name.
        field: &'static str,
        /// Raw (trimmed) text of the column.
        value: String,
    },
    /// The server token is not one of NA, EU, AS.
    #[error("unknown server {0:?} (expected NA, EU or AS)")]
    UnknownServer(String),
    /// The active flag is not `true` or `false`.
    #[error("active must be true or false, got {0:?}")]
    InvalidBool(String),
    /// The raw line bytes are not valid UTF-8.
    #[error("line is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        valid_up_to: usize,
    },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, DmsError>;
