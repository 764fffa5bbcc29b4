//! Split a cart into purchasable and unpurchasable lines.

use rustc_hash::FxHashMap;

use crate::domain::{
    carts::records::CartItemRecord,
    checkout::outcome::{UnavailableProduct, UnavailableReason},
    products::records::{ProductRecord, ProductUuid},
    tickets::data::NewTicketItem,
};

/// Cart lines sorted by whether stock covers them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Lines to buy, with title and price snapshotted from the catalog.
    pub available: Vec<NewTicketItem>,
    pub unavailable: Vec<UnavailableProduct>,
}

/// Decide each cart line against the current catalog state.
///
/// A line is available when its product exists and holds at least the
/// requested quantity. Cart order is kept in both halves.
#[must_use]
pub fn partition(
    items: &[CartItemRecord],
    products: &FxHashMap<ProductUuid, ProductRecord>,
) -> Partition {
    let mut result = Partition::default();

    for item in items {
        let Some(product) = products.get(&item.product_uuid) else {
            result.unavailable.push(UnavailableProduct {
                product_uuid: item.product_uuid,
                title: None,
                requested: item.quantity,
                reason: UnavailableReason::ProductNotFound,
            });

            continue;
        };

        if product.stock >= item.quantity {
            result.available.push(NewTicketItem {
                product_uuid: product.uuid,
                title: product.title.clone(),
                price: product.price,
                quantity: item.quantity,
            });
        } else {
            result.unavailable.push(UnavailableProduct {
                product_uuid: product.uuid,
                title: Some(product.title.clone()),
                requested: item.quantity,
                reason: UnavailableReason::InsufficientStock {
                    available: product.stock,
                    requested: item.quantity,
                },
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn product(price: u64, stock: u32) -> ProductRecord {
        let uuid = ProductUuid::new();

        ProductRecord {
            uuid,
            title: format!("Producto {uuid}"),
            description: "desc".to_string(),
            code: uuid.to_string(),
            price,
            stock,
            category: "general".to_string(),
            status: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn line(product: ProductUuid, quantity: u32) -> CartItemRecord {
        CartItemRecord {
            product_uuid: product,
            quantity,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn catalog(products: &[&ProductRecord]) -> FxHashMap<ProductUuid, ProductRecord> {
        products.iter().map(|p| (p.uuid, (*p).clone())).collect()
    }

    #[test]
    fn splits_by_stock_and_existence() {
        let enough = product(10, 5);
        let short = product(20, 1);
        let missing = ProductUuid::new();

        let result = partition(
            &[line(enough.uuid, 2), line(short.uuid, 3), line(missing, 1)],
            &catalog(&[&enough, &short]),
        );

        assert_eq!(result.available.len(), 1);
        assert_eq!(result.available[0].product_uuid, enough.uuid);
        assert_eq!(result.available[0].subtotal(), Some(20));

        let reasons: Vec<_> = result.unavailable.iter().map(|u| u.reason).collect();

        assert_eq!(
            reasons,
            [
                UnavailableReason::InsufficientStock {
                    available: 1,
                    requested: 3
                },
                UnavailableReason::ProductNotFound,
            ]
        );
        assert_eq!(result.unavailable[1].title, None);
    }

    #[test]
    fn exact_stock_is_enough() {
        let exact = product(10, 3);

        let result = partition(&[line(exact.uuid, 3)], &catalog(&[&exact]));

        assert_eq!(result.available.len(), 1);
        assert!(result.unavailable.is_empty());
    }

    #[test]
    fn snapshots_catalog_title_and_price() {
        let item = product(999, 10);

        let result = partition(&[line(item.uuid, 1)], &catalog(&[&item]));

        assert_eq!(result.available[0].title, item.title);
        assert_eq!(result.available[0].price, 999);
    }

    #[test]
    fn keeps_cart_order() {
        let a = product(1, 9);
        let b = product(2, 9);
        let c = product(3, 9);

        let result = partition(
            &[line(c.uuid, 1), line(a.uuid, 1), line(b.uuid, 1)],
            &catalog(&[&a, &b, &c]),
        );

        let order: Vec<_> = result.available.iter().map(|i| i.product_uuid).collect();

        assert_eq!(order, [c.uuid, a.uuid, b.uuid]);
    }
}
