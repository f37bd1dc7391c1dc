//! Error types and handling infrastructure for format conversion

use crate::registry::FormatId;
use std::fmt;

/// Position inside the source text (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Resolve a byte offset into a line/column pair
    pub fn from_offset(content: &str, offset: usize) -> Self {
        let offset = offset.min(content.len());
        let before = content.get(..offset).unwrap_or(content);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rfind('\n')
            .map_or(before.chars().count(), |p| before[p + 1..].chars().count())
            + 1;
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Failures raised while turning raw text into an intermediate value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input is empty")]
    EmptyInput,

    #[error("malformed {format} at {position}: {message}")]
    MalformedRecord {
        format: &'static str,
        position: Position,
        message: String,
    },
}

impl ParseError {
    pub fn malformed(format: &'static str, position: Position, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            format,
            position,
            message: message.into(),
        }
    }

    /// Position of the offending input, if the failure carries one
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::EmptyInput => None,
            Self::MalformedRecord { position, .. } => Some(*position),
        }
    }
}

/// Failures raised while rendering an intermediate value into target text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: &'static str, found: String },

    #[error("render error: {message}")]
    Render { message: String },
}

impl SerializeError {
    pub fn shape_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected,
            found: found.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

/// Why a (source, target) pair cannot be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// No declared conversion edge between the two formats
    NoPath,
    /// The parsed value has a shape the target cannot consume
    ShapeMismatch,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPath => f.write_str("no conversion path"),
            Self::ShapeMismatch => f.write_str("shape mismatch"),
        }
    }
}

/// Inner failure carried by [`ConversionError::ConversionFailed`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureCause {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),
}

/// Main error type for conversion operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("conversion from {from} to {to} is not supported: {reason}")]
    ConversionUnsupported {
        from: FormatId,
        to: FormatId,
        reason: UnsupportedReason,
    },

    #[error("conversion failed: {cause}")]
    ConversionFailed {
        #[source]
        cause: FailureCause,
    },
}

/// Flat discriminant of every failure the engine can surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownFormat,
    NoPath,
    ShapeMismatch,
    EmptyInput,
    MalformedRecord,
    SerializeShapeMismatch,
    Render,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownFormat => "UnknownFormat",
            Self::NoPath => "ConversionUnsupported(NoPath)",
            Self::ShapeMismatch => "ConversionUnsupported(ShapeMismatch)",
            Self::EmptyInput => "ParseError(EmptyInput)",
            Self::MalformedRecord => "ParseError(MalformedRecord)",
            Self::SerializeShapeMismatch => "SerializeError(ShapeMismatch)",
            Self::Render => "SerializeError(Render)",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConversionError {
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat(name.into())
    }

    pub fn unsupported(from: FormatId, to: FormatId, reason: UnsupportedReason) -> Self {
        Self::ConversionUnsupported { from, to, reason }
    }

    pub fn failed(cause: impl Into<FailureCause>) -> Self {
        Self::ConversionFailed {
            cause: cause.into(),
        }
    }

    /// Classify the failure, looking through the outer wrapper
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFormat(_) => ErrorKind::UnknownFormat,
            Self::ConversionUnsupported { reason, .. } => match reason {
                UnsupportedReason::NoPath => ErrorKind::NoPath,
                UnsupportedReason::ShapeMismatch => ErrorKind::ShapeMismatch,
            },
            Self::ConversionFailed { cause } => match cause {
                FailureCause::Parse(ParseError::EmptyInput) => ErrorKind::EmptyInput,
                FailureCause::Parse(ParseError::MalformedRecord { .. }) => {
                    ErrorKind::MalformedRecord
                }
                FailureCause::Serialize(SerializeError::ShapeMismatch { .. }) => {
                    ErrorKind::SerializeShapeMismatch
                }
                FailureCause::Serialize(SerializeError::Render { .. }) => ErrorKind::Render,
            },
        }
    }

    /// Inner parse/serialize failure, if any
    pub fn cause(&self) -> Option<&FailureCause> {
        match self {
            Self::ConversionFailed { cause } => Some(cause),
            _ => None,
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convenience result type for serialization operations
pub type SerializeResult<T> = Result<T, SerializeError>;
