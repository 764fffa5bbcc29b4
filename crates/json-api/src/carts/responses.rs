//! Cart response bodies

use salvo::oapi::ToSchema;
use serde::Serialize;
use uuid::Uuid;

use mercado_app::domain::carts::records::{CartItemRecord, CartRecord};

/// Cart Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// The items in the cart, in the order they were added
    pub items: Vec<CartItemResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        Self {
            id: cart.uuid.into_uuid(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The product in the cart
    pub product: Uuid,

    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            product: item.product_uuid.into_uuid(),
            quantity: item.quantity,
        }
    }
}
