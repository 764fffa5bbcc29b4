//! Auth data models.

use jiff::Timestamp;

use crate::{
    auth::TokenVersion,
    domain::users::records::{Role, UserUuid},
};

/// The authenticated caller behind a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_uuid: UserUuid,
    pub email: String,
    pub role: Role,
}

impl Identity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A freshly issued session; `token` is only ever available here.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Stored session joined with its owner.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub version: TokenVersion,
    pub token_hash: String,
    pub identity: Identity,
}
