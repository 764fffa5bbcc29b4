//! Purge Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::errors::into_api_error,
    envelope::{ApiResult, DeletedResponse, Envelope},
    extensions::*,
    state::State,
};

/// Purge Cart Handler
///
/// Deletes the cart and its items.
#[endpoint(tags("carts"), summary = "Delete Cart")]
#[tracing::instrument(name = "carts.purge", skip(cart, depot), fields(cart_uuid = %*cart), err)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    depot: &mut Depot,
) -> ApiResult<DeletedResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let cart = cart.into_inner();

    state
        .app
        .carts
        .delete_cart(cart.into())
        .await
        .map_err(into_api_error)?;

    tracing::info!(cart_uuid = %cart, "deleted cart");

    Ok(Envelope::with_message(
        "Carrito eliminado",
        DeletedResponse { id: cart },
    ))
}
