//! User Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    pagination::{PageResponse, page_request},
    state::State,
    users::{errors::into_api_error, responses::UserResponse},
};

/// User Index Handler
#[endpoint(tags("users"), summary = "List Users", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> ApiResult<PageResponse<UserResponse>> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let users = state
        .app
        .users
        .list_users(page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(PageResponse::from_page(users)))
}
