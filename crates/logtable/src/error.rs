use thiserror::Error;

use crate::filter::FilterError;

/// Broad classification of a [`LogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Schema/validation problems, raised eagerly.
    Schema,
    /// A coercion rule names a type tag nobody knows about.
    Type,
    /// Captured text could not be converted to its declared type.
    Conversion,
    /// Unreadable source or unwritable sink.
    Io,
    /// Malformed extraction regex, filename glob or line filter.
    Pattern,
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("No fields specified in log format")]
    NoFields,

    #[error("Unknown field found: {0:?}")]
    UnknownField(String),

    #[error("Field {field:?} is coerced to date but no date format was given")]
    MissingDateFormat { field: String },

    #[error("Unknown reducer: {0:?}")]
    UnknownReducer(String),

    #[error("Invalid type specification {tag:?} for field {field:?}")]
    InvalidType { field: String, tag: String },

    #[error("Cannot convert {value:?} in field {field:?} to {target}: {reason}")]
    Conversion {
        field: String,
        value: String,
        target: &'static str,
        reason: String,
    },

    #[error("Invalid log format: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid file pattern: {0}")]
    FilePattern(#[from] glob::PatternError),

    #[error("Invalid line filter: {0}")]
    Filter(#[from] FilterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogError::NoFields
            | LogError::UnknownField(_)
            | LogError::MissingDateFormat { .. }
            | LogError::UnknownReducer(_) => ErrorKind::Schema,
            LogError::InvalidType { .. } => ErrorKind::Type,
            LogError::Conversion { .. } => ErrorKind::Conversion,
            LogError::Io(_) | LogError::Walk(_) => ErrorKind::Io,
            LogError::Pattern(_) | LogError::FilePattern(_) | LogError::Filter(_) => {
                ErrorKind::Pattern
            }
        }
    }
}

pub type LogResult<T> = Result<T, LogError>;
