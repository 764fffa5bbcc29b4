//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Empties the cart. The cart itself remains.
#[endpoint(tags("carts"), summary = "Clear Cart")]
#[tracing::instrument(name = "carts.clear", skip(cart, depot), fields(cart_uuid = %*cart), err)]
pub(crate) async fn handler(cart: PathParam<Uuid>, depot: &mut Depot) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .clear(cart.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message("Carrito vaciado", cart.into()))
}
