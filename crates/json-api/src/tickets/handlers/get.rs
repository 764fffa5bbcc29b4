//! Get Ticket Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
    tickets::{ensure_visible, errors::into_api_error, responses::TicketResponse},
};

/// Get Ticket Handler
///
/// Returns a ticket to its buyer or to an admin.
#[endpoint(
    tags("tickets"),
    summary = "Get Ticket",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Ticket"),
        (status_code = StatusCode::FORBIDDEN, description = "Ticket belongs to someone else"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<Uuid>,
    depot: &mut Depot,
) -> ApiResult<TicketResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;

    let ticket = state
        .app
        .tickets
        .get_ticket(ticket.into_inner().into())
        .await
        .map_err(into_api_error)?;

    ensure_visible(identity, &ticket)?;

    Ok(Envelope::ok(ticket.into()))
}
