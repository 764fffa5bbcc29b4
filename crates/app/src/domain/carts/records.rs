//! Cart Records

use jiff::Timestamp;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecord {
    pub uuid: CartUuid,
    /// Items in the order they were first added.
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// Quantity held for `product`, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, product: ProductUuid) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_uuid == product)
            .map(|item| item.quantity)
    }
}

/// CartItem Record
///
/// A cart holds at most one item per product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRecord {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
