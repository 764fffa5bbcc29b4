//! Create Cart Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use mercado_app::domain::carts::{data::NewCart, records::CartUuid};

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    envelope::{ApiResult, Envelope},
    extensions::*,
    state::State,
};

/// Create Cart Handler
///
/// Creates an empty cart.
#[endpoint(
    tags("carts"),
    summary = "Create Cart",
    responses(
        (status_code = StatusCode::CREATED, description = "Cart created"),
        (status_code = StatusCode::CONFLICT, description = "Cart already exists"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "carts.create", skip(depot, res), err)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> ApiResult<CartResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .create_cart(NewCart {
            uuid: CartUuid::new(),
        })
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/carts/{}", cart.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(cart_uuid = %cart.uuid, "created cart");

    Ok(Envelope::with_message("Carrito creado", cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{MockServices, make_cart, public_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        public_service(
            MockServices {
                carts,
                ..MockServices::default()
            },
            Router::with_path("carts").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_cart_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_create_cart()
            .once()
            .return_once(|new| Ok(make_cart(new.uuid, &[])));

        let mut res = TestClient::post("http://example.com/carts")
            .send(&make_service(carts))
            .await;

        let body: Value = res.take_json().await?;
        let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/carts/{id}").as_str()));
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["items"], json!([]));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_cart_conflict_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_create_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/carts")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
