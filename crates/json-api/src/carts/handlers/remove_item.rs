//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Drops the product's line. Removing a product that is not in the cart
/// leaves the cart unchanged.
#[endpoint(tags("carts"), summary = "Remove Product From Cart")]
#[tracing::instrument(
    name = "carts.items.remove",
    skip(cart, product, depot),
    fields(cart_uuid = %*cart, product_uuid = %*product),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_item(cart.into_inner().into(), product.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message(
        "Producto eliminado del carrito",
        cart.into(),
    ))
}
