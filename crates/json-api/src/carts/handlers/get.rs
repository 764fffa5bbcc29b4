//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns a cart with its items in insertion order.
#[endpoint(tags("carts"), summary = "Get Cart")]
pub(crate) async fn handler(cart: PathParam<Uuid>, depot: &mut Depot) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(cart.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(cart.into()))
}
