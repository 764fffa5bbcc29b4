//! Paged listing bodies and query parsing.

use salvo::oapi::{ToSchema, extract::QueryParam};
use serde::Serialize;

use mercado_app::pagination::{Page, PageRequest};

/// One page of a listing.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageResponse<T: ToSchema + 'static> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl<T: ToSchema + 'static> PageResponse<T> {
    pub(crate) fn from_page<R: Into<T>>(page: Page<R>) -> Self {
        let total_pages = page.total_pages();
        let has_more = page.has_more();

        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages,
            has_more,
        }
    }
}

/// Out-of-range values are clamped rather than rejected.
pub(crate) fn page_request(page: QueryParam<u32, false>, limit: QueryParam<u32, false>) -> PageRequest {
    PageRequest::new(page.into_inner(), limit.into_inner())
}
