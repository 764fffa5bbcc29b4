//! Admin Ticket Stats Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
    tickets::{errors::into_api_error, responses::TicketStatsResponse},
};

/// Admin Ticket Stats Handler
///
/// Aggregate revenue and volume over the whole ledger.
#[endpoint(
    tags("tickets"),
    summary = "Ticket Stats",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(depot: &mut Depot) -> ApiResult<TicketStatsResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .tickets
        .ticket_stats()
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(stats.into()))
}
