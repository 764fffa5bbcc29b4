//! Verify Password Reset Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::Serialize;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    password_resets::errors::into_api_error,
    state::State,
};

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ResetTokenResponse {
    /// Account the token resets
    pub email: String,
}

/// Verify Password Reset Handler
///
/// Checks that a reset token is still usable without consuming it.
#[endpoint(tags("password-reset"), summary = "Verify Reset Token")]
pub(crate) async fn handler(
    token: PathParam<String>,
    depot: &mut Depot,
) -> ApiResult<ResetTokenResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let email = state
        .app
        .password_resets
        .verify_reset(&token.into_inner())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(ResetTokenResponse { email }))
}
