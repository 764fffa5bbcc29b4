//! Tickets service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::validation::Violations;

#[derive(Debug, Error)]
pub enum TicketsServiceError {
    #[error("ticket already exists")]
    AlreadyExists,

    #[error("ticket not found")]
    NotFound,

    #[error("invalid ticket: {0}")]
    Validation(Violations),

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for TicketsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<Violations> for TicketsServiceError {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}
