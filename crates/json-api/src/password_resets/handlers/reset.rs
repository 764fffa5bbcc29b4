//! Reset Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    password_resets::errors::into_api_error,
    state::State,
};

/// Reset Password Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct ResetPasswordRequest {
    pub token: String,
    /// New password, at least 8 characters
    pub password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest").finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordResetResponse {
    /// Every session was revoked; the user must sign in again
    pub sessions_revoked: bool,
}

/// Reset Password Handler
///
/// Consumes the token and sets the new password. Every session of the
/// account is revoked.
#[endpoint(
    tags("password-reset"),
    summary = "Reset Password",
    responses(
        (status_code = StatusCode::OK, description = "Password updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid token or password"),
    ),
)]
#[tracing::instrument(name = "password_reset.reset", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<ResetPasswordRequest>,
    depot: &mut Depot,
) -> ApiResult<PasswordResetResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    state
        .app
        .password_resets
        .reset_password(&request.token, &request.password)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message(
        "Contraseña actualizada",
        PasswordResetResponse {
            sessions_revoked: true,
        },
    ))
}
