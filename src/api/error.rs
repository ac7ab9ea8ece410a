//! Conversion of crate errors into client-facing error bodies.

use crate::errors::{Error, ErrorKind};
use serde::Serialize;
use tracing::error;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Error payload returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Classification of the failure
    pub kind: ErrorKind,
    /// Input field the error refers to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    /// Human-readable reason
    pub message: String,
}

impl ErrorBody {
    /// HTTP-equivalent status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Internal {
            // Details stay in the logs
            error!("Request failed: {err}");
            return Self {
                kind,
                field: None,
                message: INTERNAL_MESSAGE.to_string(),
            };
        }

        let message = match err {
            Error::Validation { message, .. }
            | Error::Conflict { message, .. }
            | Error::NotRelated { message, .. }
            | Error::Permission { message } => message.clone(),
            other => other.to_string(),
        };
        Self {
            kind,
            field: err.field(),
            message,
        }
    }
}

impl From<Error> for ErrorBody {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}
