//! Password Reset Records

use jiff::Timestamp;

use crate::{
    auth::TokenVersion,
    domain::users::records::UserUuid,
    uuids::TypedUuid,
};

/// Password Reset UUID
pub type PasswordResetUuid = TypedUuid<PendingReset>;

/// An unused, unexpired reset joined with its owner.
#[derive(Clone)]
pub struct PendingReset {
    pub uuid: PasswordResetUuid,
    pub user_uuid: UserUuid,
    pub version: TokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for PendingReset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingReset")
            .field("uuid", &self.uuid)
            .field("user_uuid", &self.user_uuid)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
