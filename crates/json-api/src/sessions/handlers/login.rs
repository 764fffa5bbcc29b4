//! Login Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    sessions::responses::SessionResponse,
    state::State,
    users::errors::{into_api_error, session_error},
};

/// Login Request
#[derive(Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login Handler
///
/// Exchanges credentials for a bearer token valid for 24 hours.
#[endpoint(
    tags("sessions"),
    summary = "Login",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid credentials"),
    ),
)]
#[tracing::instrument(name = "sessions.login", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> ApiResult<SessionResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .authenticate(&request.email, &request.password)
        .await
        .map_err(into_api_error)?;

    let session = state
        .app
        .auth
        .issue_session(user.uuid)
        .await
        .map_err(session_error)?;

    tracing::info!(user_uuid = %user.uuid, "user signed in");

    Ok(Envelope::with_message(
        "Sesión iniciada",
        SessionResponse::new(session, user),
    ))
}
