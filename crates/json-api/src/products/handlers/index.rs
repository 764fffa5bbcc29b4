//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use mercado_app::domain::products::data::PriceSort;

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extensions::*,
    pagination::{PageResponse, page_request},
    products::{errors::into_api_error, responses::ProductResponse},
    state::State,
};

/// Product Index Handler
///
/// Returns one page of the catalog, optionally ordered by price
/// (`sort=asc` or `sort=desc`).
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    sort: QueryParam<String, false>,
    depot: &mut Depot,
) -> ApiResult<PageResponse<ProductResponse>> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let sort = parse_sort(sort.into_inner().as_deref())?;

    let products = state
        .app
        .products
        .list_products(page_request(page, limit), sort)
        .await
        .map_err(into_api_error)?;

    Ok(Envelope::ok(PageResponse::from_page(products)))
}

fn parse_sort(value: Option<&str>) -> Result<Option<PriceSort>, ApiError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("") => Ok(None),
        Some("asc") => Ok(Some(PriceSort::Asc)),
        Some("desc") => Ok(Some(PriceSort::Desc)),
        Some(_) => Err(ApiError::bad_request(
            "El orden debe ser 'asc' o 'desc'",
        )),
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use mercado_app::{
        domain::products::{MockProductsService, records::ProductUuid},
        pagination::{Page, PageRequest},
    };

    use crate::test_helpers::{MockServices, make_product, public_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        public_service(
            MockServices {
                products,
                ..MockServices::default()
            },
            Router::with_path("products").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_passes_page_and_sort() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|request, sort| {
                *request == PageRequest::new(Some(1), Some(20)) && *sort == Some(PriceSort::Desc)
            })
            .return_once(|request, _| {
                Ok(Page::new(vec![make_product(ProductUuid::new())], request, 1))
            });

        let mut res = TestClient::get("http://example.com/products?limit=20&sort=DESC")
            .send(&make_service(products))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["limit"], 20);
        assert_eq!(body["data"]["items"][0]["code"], "YERBA-1");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_sort_returns_400() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_list_products().never();

        let res = TestClient::get("http://example.com/products?sort=price")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[test]
    fn test_sort_is_optional() {
        assert_eq!(parse_sort(None).ok(), Some(None));
        assert_eq!(parse_sort(Some("asc")).ok(), Some(Some(PriceSort::Asc)));
    }
}
