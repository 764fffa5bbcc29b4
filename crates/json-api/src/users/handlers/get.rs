//! Get User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
    users::{errors::into_api_error, responses::UserResponse},
};

/// Get User Handler
#[endpoint(tags("users"), summary = "Get User", security(("bearer_auth" = [])))]
pub(crate) async fn handler(user: PathParam<Uuid>, depot: &mut Depot) -> ApiResult<UserResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .get_user(user.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(user.into()))
}
