//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use mercado_app::domain::checkout::CheckoutServiceError;

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    observability::{CheckoutOutcome as CheckoutMetric, observe_checkout},
    state::State,
    tickets::{errors::checkout_error, responses::CheckoutResponse},
};

/// Checkout Request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutRequest {
    /// Cart to buy from
    pub cart_id: Uuid,
}

/// Checkout Handler
///
/// Buys every purchasable line of the cart on behalf of the caller. Lines
/// that are missing or short on stock stay in the cart and are listed in
/// `unavailableProducts`.
#[endpoint(
    tags("tickets"),
    summary = "Checkout Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Ticket issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::CONFLICT, description = "Nothing in the cart could be bought"),
    ),
)]
#[tracing::instrument(
    name = "tickets.checkout",
    skip(json, depot, res),
    fields(cart_uuid = tracing::field::Empty, ticket_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> ApiResult<CheckoutResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let identity = depot.identity_or_401()?;
    let cart = json.into_inner().cart_id;

    let span = tracing::Span::current();

    span.record("cart_uuid", tracing::field::display(cart));

    let outcome = match state
        .app
        .checkout
        .process_checkout(cart.into(), &identity.email)
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => {
            if matches!(
                error,
                CheckoutServiceError::EmptyCart | CheckoutServiceError::NothingAvailable { .. }
            ) {
                observe_checkout(CheckoutMetric::Rejected);
            }

            return Err(checkout_error(error));
        }
    };

    let ticket = outcome.ticket.uuid;
    let partial = !outcome.unavailable.is_empty();

    span.record("ticket_uuid", tracing::field::display(ticket));

    observe_checkout(if partial {
        CheckoutMetric::Partial
    } else {
        CheckoutMetric::Completed
    });

    res.add_header(LOCATION, format!("/tickets/{ticket}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(
        ticket_uuid = %ticket,
        amount = outcome.summary.total_amount,
        unavailable = outcome.unavailable.len(),
        "checkout completed"
    );

    let message = if partial {
        "Compra realizada parcialmente"
    } else {
        "Compra realizada"
    };

    Ok(Envelope::with_message(message, outcome.into()))
}
