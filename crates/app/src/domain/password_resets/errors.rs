//! Password reset service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    auth::{OpenBaoError, PasswordError},
    domain::password_resets::NotifierError,
    validation::Violations,
};

#[derive(Debug, Error)]
pub enum PasswordResetsServiceError {
    #[error("reset token is invalid or expired")]
    InvalidToken,

    #[error("new password must differ from the current one")]
    PasswordReused,

    #[error("invalid password: {0}")]
    Validation(Violations),

    #[error("password processing error")]
    Password(#[from] PasswordError),

    #[error("OpenBao error")]
    OpenBao(#[from] OpenBaoError),

    #[error(transparent)]
    Notifier(#[from] NotifierError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PasswordResetsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<Violations> for PasswordResetsServiceError {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}
