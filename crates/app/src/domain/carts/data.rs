//! Cart Data

use rustc_hash::FxHashSet;

use crate::{
    domain::{carts::records::CartUuid, products::records::ProductUuid},
    validation::{MAX_COUNT, Violations},
};

/// New Cart Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
}

/// One entry of a full cart replacement, as received from a client.
///
/// The quantity is kept signed until validated so out-of-range input can be
/// reported rather than rejected at deserialization.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: i64,
}

pub(crate) const INVALID_QUANTITY: &str = "la cantidad debe ser un número entero positivo";

/// Narrow a client quantity to `1..=MAX_COUNT`.
pub(crate) fn positive_quantity(quantity: i64) -> Option<u32> {
    u32::try_from(quantity)
        .ok()
        .filter(|quantity| (1..=MAX_COUNT).contains(quantity))
}

/// Check quantities and duplicates of a replacement payload.
///
/// Product existence is checked separately against storage; `missing` lists
/// the products that were not found so their violations appear alongside the
/// rest, in payload order.
pub(crate) fn validate_items(
    items: &[NewCartItem],
    missing: &FxHashSet<ProductUuid>,
) -> Result<Vec<(ProductUuid, u32)>, Violations> {
    let mut violations = Violations::new();
    let mut seen = FxHashSet::default();
    let mut valid = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        if missing.contains(&item.product_uuid) {
            violations.push(
                format!("items[{index}].product"),
                format!("Producto no encontrado: {}", item.product_uuid),
            );
        }

        if !seen.insert(item.product_uuid) {
            violations.push(
                format!("items[{index}].product"),
                "producto duplicado en el carrito",
            );
        }

        match positive_quantity(item.quantity) {
            Some(quantity) => valid.push((item.product_uuid, quantity)),
            None => violations.push(format!("items[{index}].quantity"), INVALID_QUANTITY),
        }
    }

    violations.into_result().map(|()| valid)
}
