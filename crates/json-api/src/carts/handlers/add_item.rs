//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Add Cart Item Handler
///
/// Adds one unit of the product, merging into its existing line.
#[endpoint(
    tags("carts"),
    summary = "Add Product To Cart",
    responses(
        (status_code = StatusCode::OK, description = "Product added"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.add",
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
        .add_item(cart.into_inner().into(), product.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message("Producto agregado al carrito", cart.into()))
}
