/// Flashbind Error Module
///
/// This module defines the error type shared by every binding operation.
/// Best-effort misses (unknown members, unconstructible children) are not
/// errors; only coercion, cursor, parameter and database failures are.
use crate::core::value::ValueType;
use thiserror::Error;

/// Error type for the binding engine and its SQLite execution context.
///
/// The variants fall into three groups:
/// - Coercion failures raised while assigning a value to a member
/// - Failures reported by a cursor or parameter sink
/// - Database, configuration and I/O failures from the surrounding layer
#[derive(Error, Debug)]
pub enum FlashError {
    /// Errors from SQLite operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A value's runtime type differs from the member's declared type
    #[error("Type mismatch on `{member}`: expected {expected}, found {found}")]
    TypeMismatch {
        member: String,
        expected: ValueType,
        found: ValueType,
    },

    /// Text that names no variant of the member's enumeration
    #[error("Enum error: `{value}` is not a variant of `{member}`")]
    EnumParse { member: String, value: String },

    /// A `Value` could not be converted into the requested Rust type
    #[error("Conversion error: expected {expected}, found {found}")]
    Conversion { expected: ValueType, found: ValueType },

    /// Row cursor failures (out of range reads, exhausted cursors)
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Parameter sink failures (duplicate names, unsupported values)
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use FlashError as the error type.
pub type Result<T> = std::result::Result<T, FlashError>;
