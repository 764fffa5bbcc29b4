//! Product response bodies

use salvo::oapi::ToSchema;
use serde::Serialize;
use uuid::Uuid;

use mercado_app::domain::products::records::ProductRecord;

/// Product Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,

    /// Unique SKU
    pub code: String,

    /// Price in minor units
    pub price: u64,

    pub stock: u32,
    pub category: String,

    /// Whether the product is listed for sale
    pub status: bool,

    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            title: product.title,
            description: product.description,
            code: product.code,
            price: product.price,
            stock: product.stock,
            category: product.category,
            status: product.status,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}
