//! Admin Ticket Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use mercado_app::domain::tickets::{data::TicketFilter, records::TicketStatus};

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extensions::*,
    pagination::{PageResponse, page_request},
    state::State,
    tickets::{errors::into_api_error, responses::TicketResponse},
};

/// Admin Ticket Index Handler
///
/// Lists every ticket, newest first, optionally filtered by status and by a
/// case-insensitive purchaser substring.
#[endpoint(
    tags("tickets"),
    summary = "List All Tickets",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    status: QueryParam<String, false>,
    purchaser: QueryParam<String, false>,
    depot: &mut Depot,
) -> ApiResult<PageResponse<TicketResponse>> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = status
        .into_inner()
        .map(|value| value.parse::<TicketStatus>())
        .transpose()
        .map_err(|error| ApiError::bad_request(format!("Estado inválido: {}", error.0)))?;

    let filter = TicketFilter {
        status,
        purchaser: purchaser
            .into_inner()
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty()),
    };

    let tickets = state
        .app
        .tickets
        .list_tickets(filter, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(PageResponse::from_page(tickets)))
}
