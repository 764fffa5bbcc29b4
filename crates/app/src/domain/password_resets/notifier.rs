//! Delivery of issued reset tokens.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use thiserror::Error;
use tracing::info;

/// A reset token ready to be handed to its owner.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetNotice {
    pub email: String,
    pub token: String,
    pub expires_at: Timestamp,
}

impl fmt::Debug for ResetNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetNotice")
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
#[error("failed to deliver password reset notice: {0}")]
pub struct NotifierError(pub String);

#[automock]
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send(&self, notice: ResetNotice) -> Result<(), NotifierError>;
}

/// Records issuance in the log. The token itself is never written out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogResetNotifier;

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send(&self, notice: ResetNotice) -> Result<(), NotifierError> {
        info!(
            email = %notice.email,
            expires_at = %notice.expires_at,
            "password reset issued"
        );

        Ok(())
    }
}
