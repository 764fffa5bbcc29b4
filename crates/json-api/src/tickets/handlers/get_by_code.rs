//! Get Ticket By Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
    tickets::{ensure_visible, errors::into_api_error, responses::TicketResponse},
};

/// Get Ticket By Code Handler
///
/// Looks a ticket up by its human-readable code.
#[endpoint(
    tags("tickets"),
    summary = "Get Ticket By Code",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(code: PathParam<String>, depot: &mut Depot) -> ApiResult<TicketResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let ticket = state
        .app
        .tickets
        .get_ticket_by_code(&code.into_inner())
        .await
        .map_err(into_api_error)?;

    ensure_visible(identity, &ticket)?;

    Ok(Envelope::ok(ticket.into()))
}
