//! Bulk Delete Products Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mercado_app::domain::products::data::ProductDeletion;

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extensions::*,
    products::errors::into_api_error,
    state::State,
};

/// Bulk Delete Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DeletionResult {
    Deleted,
    NotFound,
    Failed,
}

impl From<ProductDeletion> for DeletionResult {
    fn from(deletion: ProductDeletion) -> Self {
        match deletion {
            ProductDeletion::Deleted => Self::Deleted,
            ProductDeletion::NotFound => Self::NotFound,
            ProductDeletion::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletionOutcome {
    pub id: Uuid,
    pub result: DeletionResult,
}

/// Bulk Delete Response
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BulkDeleteResponse {
    pub deleted: usize,
    pub results: Vec<DeletionOutcome>,
}

/// Bulk Delete Products Handler
///
/// Deletes each product independently and reports one result per id.
#[endpoint(
    tags("products"),
    summary = "Delete Products",
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(
    name = "products.bulk_delete",
    skip(json, depot),
    fields(requested = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<BulkDeleteRequest>,
    depot: &mut Depot,
) -> ApiResult<BulkDeleteResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let ids = json.into_inner().ids;

    if ids.is_empty() {
        return Err(ApiError::bad_request("Debe indicar al menos un producto"));
    }

    tracing::Span::current().record("requested", ids.len());

    let outcomes = state
        .app
        .products
        .delete_products(ids.into_iter().map(Into::into).collect())
        .await
        .map_err(into_api_error)?;

    let results: Vec<DeletionOutcome> = outcomes
        .into_iter()
        .map(|(product, deletion)| DeletionOutcome {
            id: product.into_uuid(),
            result: deletion.into(),
        })
        .collect();

    let deleted = results
        .iter()
        .filter(|outcome| matches!(outcome.result, DeletionResult::Deleted))
        .count();

    tracing::info!(deleted, requested = results.len(), "bulk deleted products");

    Ok(Envelope::with_message(
        format!("{deleted} productos eliminados"),
        BulkDeleteResponse { deleted, results },
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::domain::products::{MockProductsService, records::ProductUuid};

    use crate::test_helpers::{MockServices, admin_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        admin_service(
            MockServices {
                products,
                ..MockServices::default()
            },
            Router::with_path("products").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_reports_each_outcome() -> TestResult {
        let present = ProductUuid::new();
        let missing = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_delete_products()
            .once()
            .withf(move |ids| *ids == vec![present, missing])
            .return_once(move |_| {
                Ok(vec![
                    (present, ProductDeletion::Deleted),
                    (missing, ProductDeletion::NotFound),
                ])
            });

        let mut res = TestClient::delete("http://example.com/products")
            .json(&json!({ "ids": [present.to_string(), missing.to_string()] }))
            .send(&make_service(products))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["deleted"], 1);
        assert_eq!(
            body["data"]["results"],
            json!([
                { "id": present.to_string(), "result": "deleted" },
                { "id": missing.to_string(), "result": "not_found" },
            ])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_id_list_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_delete_products().never();

        let res = TestClient::delete("http://example.com/products")
            .json(&json!({ "ids": [] }))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
