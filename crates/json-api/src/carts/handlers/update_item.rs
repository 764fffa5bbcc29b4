//! Update Cart Item Handler

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

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; must be a positive integer
    pub quantity: i64,
}

/// Update Cart Item Handler
///
/// Overwrites the quantity of a product already in the cart.
#[endpoint(
    tags("carts"),
    summary = "Set Cart Item Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or item not found"),
    ),
)]
#[tracing::instrument(
    name = "carts.items.update",
    skip(cart, product, json, depot),
    fields(cart_uuid = %*cart, product_uuid = %*product, quantity = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    product: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let quantity = json.into_inner().quantity;

    tracing::Span::current().record("quantity", quantity);

    let cart = state
        .app
        .carts
        .set_item_quantity(cart.into_inner().into(), product.into_inner().into(), quantity)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::with_message("Cantidad actualizada", cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::{
        domain::{
            carts::{CartsServiceError, MockCartsService, records::CartUuid},
            products::records::ProductUuid,
        },
        validation::Violations,
    };

    use crate::test_helpers::{MockServices, make_cart, public_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        public_service(
            MockServices {
                carts,
                ..MockServices::default()
            },
            Router::with_path("carts/{cart}/product/{product}").put(handler),
        )
    }

    fn url(cart: CartUuid, product: ProductUuid) -> String {
        format!("http://example.com/carts/{cart}/product/{product}")
    }

    #[tokio::test]
    async fn test_update_item_overwrites_quantity() -> TestResult {
        let cart = CartUuid::new();
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_set_item_quantity()
            .once()
            .withf(move |c, p, q| *c == cart && *p == product && *q == 7)
            .return_once(move |_, _, _| Ok(make_cart(cart, &[(product, 7)])));

        let mut res = TestClient::put(url(cart, product))
            .json(&json!({ "quantity": 7 }))
            .send(&make_service(carts))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["items"][0]["quantity"], 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_rejects_non_positive_quantity() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_set_item_quantity()
            .once()
            .withf(|_, _, q| *q == 0)
            .return_once(|_, _, _| {
                let mut violations = Violations::new();

                violations.push("quantity", "la cantidad debe ser un número entero positivo");

                Err(CartsServiceError::Validation(violations))
            });

        let mut res = TestClient::put(url(CartUuid::new(), ProductUuid::new()))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["details"]["violations"][0]["field"], "quantity");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_not_in_cart_returns_404() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_set_item_quantity()
            .once()
            .return_once(move |_, _, _| Err(CartsServiceError::ItemNotFound(product)));

        let res = TestClient::put(url(CartUuid::new(), product))
            .json(&json!({ "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_item_rejects_fractional_quantity_before_service() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_set_item_quantity().never();

        let res = TestClient::put(url(CartUuid::new(), ProductUuid::new()))
            .json(&json!({ "quantity": 1.5 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
