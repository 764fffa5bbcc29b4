//! Current Session Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
    users::{errors::into_api_error, responses::UserResponse},
};

/// Current Session Handler
///
/// Returns the account behind the bearer token.
#[endpoint(tags("sessions"), summary = "Current User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> ApiResult<UserResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let user = state
        .app
        .users
        .get_user(identity.user_uuid)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(user.into()))
}
