//! Session response bodies

use salvo::oapi::ToSchema;
use serde::Serialize;

use mercado_app::{auth::IssuedSession, domain::users::records::UserRecord};

use crate::users::responses::UserResponse;

/// Session Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,

    pub expires_at: String,

    pub user: UserResponse,
}

impl SessionResponse {
    pub(crate) fn new(session: IssuedSession, user: UserRecord) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at.to_string(),
            user: user.into(),
        }
    }
}
