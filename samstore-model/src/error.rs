use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    MissingField(&'static str),
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidSlug {
        field: &'static str,
        value: String,
    },
    OutOfRange {
        field: &'static str,
        reason: String,
    },
}

impl ModelError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ModelError::MissingField(field)
            | ModelError::TooLong { field, .. }
            | ModelError::InvalidSlug { field, .. }
            | ModelError::OutOfRange { field, .. } => field,
        }
    }
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MissingField(field) => {
                write!(f, "{field}: this field is required")
            }
            ModelError::TooLong { field, max, actual } => write!(
                f,
                "{field}: ensure this field has no more than {max} characters (it has {actual})"
            ),
            ModelError::InvalidSlug { field, value } => write!(
                f,
                "{field}: '{value}' is not a valid slug (letters, numbers, underscores or hyphens)"
            ),
            ModelError::OutOfRange { field, reason } => {
                write!(f, "{field}: {reason}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
