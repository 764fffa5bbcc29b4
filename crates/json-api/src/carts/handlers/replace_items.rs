//! Replace Cart Items Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use mercado_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Replace Cart Items Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ReplaceCartItemsRequest {
    pub items: Vec<CartItemRequest>,
}

/// One line of a replacement payload.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CartItemRequest {
    pub product: Uuid,
    pub quantity: i64,
}

impl From<CartItemRequest> for NewCartItem {
    fn from(request: CartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product.into(),
            quantity: request.quantity,
        }
    }
}

/// Replace Cart Items Handler
///
/// Replaces every item in the cart. A single invalid entry rejects the whole
/// payload and leaves the cart untouched.
#[endpoint(
    tags("carts"),
    summary = "Replace Cart Items",
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid items"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or product not found"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.replace",
    skip(cart, json, depot),
    fields(cart_uuid = %*cart, items_count = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<ReplaceCartItemsRequest>,
    depot: &mut Depot,
) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let items: Vec<NewCartItem> = json
        .into_inner()
        .items
        .into_iter()
        .map(Into::into)
        .collect();

    tracing::Span::current().record("items_count", items.len());

    let cart = state
        .app
        .carts
        .set_items(cart.into_inner().into(), items)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message("Carrito actualizado", cart.into()))
}
