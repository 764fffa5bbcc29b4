//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiResult, DeletedResponse, Envelope},
    extensions::*,
    products::errors::into_api_error,
    state::State,
};

/// Delete Product Handler
///
/// Tickets keep their snapshot of the product.
#[endpoint(tags("products"), summary = "Delete Product", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "products.delete", skip(product, depot), fields(product_uuid = %*product), err)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> ApiResult<DeletedResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let product = product.into_inner();

    state
        .app
        .products
        .delete_product(product.into())
        .await
        .map_err(into_api_error)?;

    tracing::info!(product_uuid = %product, "deleted product");

    Ok(Envelope::with_message(
        "Producto eliminado",
        DeletedResponse { id: product },
    ))
}
