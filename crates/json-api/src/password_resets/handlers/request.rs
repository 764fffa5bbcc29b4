//! Request Password Reset Handler

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

/// Request Reset Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RequestResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ResetRequestedResponse {
    pub email: String,
}

/// Request Password Reset Handler
///
/// Answers the same way whether or not the email belongs to an account.
#[endpoint(tags("password-reset"), summary = "Request Password Reset")]
#[tracing::instrument(name = "password_reset.request", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<RequestResetRequest>,
    depot: &mut Depot,
) -> ApiResult<ResetRequestedResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let email = json.into_inner().email;

    state
        .app
        .password_resets
        .request_reset(&email)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message(
        "Si el email está registrado, recibirá un enlace para restablecer la contraseña",
        ResetRequestedResponse { email },
    ))
}
