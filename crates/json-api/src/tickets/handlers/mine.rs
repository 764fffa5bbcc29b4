//! My Tickets Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    pagination::{PageResponse, page_request},
    state::State,
    tickets::{errors::into_api_error, responses::TicketResponse},
};

/// My Tickets Handler
///
/// Lists the caller's tickets, newest first.
#[endpoint(
    tags("tickets"),
    summary = "List My Tickets",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> ApiResult<PageResponse<TicketResponse>> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let tickets = state
        .app
        .tickets
        .list_tickets_for_purchaser(&identity.email, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(PageResponse::from_page(tickets)))
}
