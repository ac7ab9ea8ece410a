//! Unified error type for Foodgram.
//!
//! Domain failures carry the field or reason they relate to so the boundary layer
//! can report them without string matching. Storage and I/O failures are kept as
//! internal variants.

use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input rejected before anything was written
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending input field
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// The write would duplicate an existing row or break a relationship rule
    #[error("{message}")]
    Conflict {
        /// Name of the field the conflict is reported on
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// A referenced row does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of row that was looked up (e.g. "recipe")
        entity: &'static str,
        /// The identifier that was requested
        id: i64,
    },

    /// A relationship that was asked to be removed does not exist
    #[error("{message}")]
    NotRelated {
        /// Name of the field the error is reported on
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// The requester is not allowed to perform the operation
    #[error("Permission denied: {message}")]
    Permission {
        /// Human-readable reason
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure (reading configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Integer conversion failure (page sizes, limits)
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

/// Coarse classification used by the boundary layer.
///
/// Serializes as `validation`, `conflict`, `not_found`, `permission` or `internal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected input
    Validation,
    /// Duplicate or forbidden relationship
    Conflict,
    /// Missing row or relationship
    NotFound,
    /// Requester lacks the rights for the operation
    Permission,
    /// Anything the caller cannot fix
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Conflict => 409,
            Self::NotFound => 404,
            Self::Permission => 403,
            Self::Internal => 500,
        }
    }
}

impl Error {
    /// Shorthand for a field-scoped validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a field-scoped conflict error.
    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a permission error.
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// Classifies the error for the boundary layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::NotFound { .. } | Self::NotRelated { .. } => ErrorKind::NotFound,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::IntConversion(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The input field the error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. }
            | Self::Conflict { field, .. }
            | Self::NotRelated { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Returns true when the database rejected a write because of a unique or
/// primary-key constraint.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    // SQLite reports composite primary-key collisions with this message
    err.to_string().contains("UNIQUE constraint failed")
}

/// Maps a unique violation to a conflict on `field`, passing every other
/// database error through unchanged.
pub fn map_unique_violation(err: DbErr, field: &'static str, message: &str) -> Error {
    if is_unique_violation(&err) {
        Error::conflict(field, message)
    } else {
        Error::Database(err)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::validation("ingredients", "empty").kind(),
            ErrorKind::Validation
        );
        assert_eq!(Error::conflict("recipe", "dup").kind(), ErrorKind::Conflict);
        assert_eq!(
            Error::NotFound {
                entity: "recipe",
                id: 1
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::NotRelated {
                field: "recipe",
                message: "missing".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(Error::permission("nope").kind(), ErrorKind::Permission);
        assert_eq!(
            Error::Config {
                message: "bad".to_string()
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_status_code_follows_kind() {
        assert_eq!(ErrorKind::Validation.status_code(), 400);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Permission.status_code(), 403);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_field_is_exposed_for_scoped_errors() {
        assert_eq!(Error::validation("name", "x").field(), Some("name"));
        assert_eq!(Error::conflict("author", "x").field(), Some("author"));
        assert_eq!(Error::permission("x").field(), None);
    }

    #[test]
    fn test_non_unique_db_error_passes_through() {
        let err = map_unique_violation(
            DbErr::Custom("connection reset".to_string()),
            "recipe",
            "already there",
        );
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_unique_message_maps_to_conflict() {
        let err = map_unique_violation(
            DbErr::Custom("UNIQUE constraint failed: favorites.user_id".to_string()),
            "recipe",
            "already there",
        );
        assert!(matches!(err, Error::Conflict { field: "recipe", .. }));
    }
}
