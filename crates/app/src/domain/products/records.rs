//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub title: String,
    pub description: String,
    /// Unique SKU.
    pub code: String,
    /// Unit price in minor units.
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
