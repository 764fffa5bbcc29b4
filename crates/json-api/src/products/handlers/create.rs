//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use mercado_app::domain::products::{data::NewProduct, records::ProductUuid};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    products::{errors::into_api_error, responses::ProductResponse},
    state::State,
};

const fn listed() -> bool {
    true
}

/// Create Product Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: u64,
    pub stock: u32,
    pub category: String,
    #[serde(default = "listed")]
    pub status: bool,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            uuid: ProductUuid::new(),
            title: request.title,
            description: request.description,
            code: request.code,
            price: request.price,
            stock: request.stock,
            category: request.category,
            status: request.status,
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid product"),
        (status_code = StatusCode::CONFLICT, description = "Code already in use"),
    ),
)]
#[tracing::instrument(
    name = "products.create",
    skip(json, depot, res),
    fields(code = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> ApiResult<ProductResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    tracing::Span::current().record("code", request.code.as_str());

    let product = state
        .app
        .products
        .create_product(request.into())
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(product_uuid = %product.uuid, "created product");

    Ok(Envelope::with_message("Producto creado", product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::{
        domain::products::{MockProductsService, ProductsServiceError},
        validation::Violations,
    };

    use crate::test_helpers::{MockServices, admin_service, make_product};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_service(
            MockServices {
                products,
                ..MockServices::default()
            },
            Router::with_path("products").post(handler),
        )
    }

    fn payload() -> Value {
        json!({
            "title": "Yerba",
            "description": "Yerba mate 1kg",
            "code": "YERBA-1",
            "price": 100,
            "stock": 5,
            "category": "almacen",
        })
    }

    #[tokio::test]
    async fn test_create_product_defaults_to_listed() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(|new| new.code == "YERBA-1" && new.status && new.price == 100)
            .return_once(|new| Ok(make_product(new.uuid)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&payload())
            .send(&make_service(products))
            .await;

        let body: Value = res.take_json().await?;
        let id = body["data"]["id"].as_str().unwrap_or_default().to_string();
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/products/{id}").as_str()));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_code_returns_409() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products")
            .json(&payload())
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_product_returns_violations() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().once().return_once(|_| {
            let mut violations = Violations::new();

            violations.push("price", "el precio debe ser mayor a 0");

            Err(ProductsServiceError::Validation(violations))
        });

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "title": "Yerba",
                "description": "Yerba mate 1kg",
                "code": "YERBA-1",
                "price": 0,
                "stock": 5,
                "category": "almacen",
            }))
            .send(&make_service(products))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["details"]["violations"][0]["field"], "price");

        Ok(())
    }

    #[tokio::test]
    async fn test_negative_stock_is_rejected_before_service() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_create_product().never();

        let mut payload = payload();

        payload["stock"] = json!(-1);

        let res = TestClient::post("http://example.com/products")
            .json(&payload)
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
