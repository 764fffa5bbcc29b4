//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{INVALID_QUANTITY, NewCart, NewCartItem, positive_quantity, validate_items},
            errors::CartsServiceError,
            records::{CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{PgProductsRepository, records::ProductUuid},
    },
    validation::{MAX_COUNT, Violations},
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut record = self.carts_repository.get_cart(tx, cart).await?;

        record.items = self.items_repository.get_cart_items(tx, cart).await?;

        Ok(record)
    }

    async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), CartsServiceError> {
        if self.carts_repository.lock_cart(tx, cart).await? {
            Ok(())
        } else {
            Err(CartsServiceError::NotFound)
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.carts_repository.create_cart(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn add_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let existing = self
            .products_repository
            .find_existing_products(&mut tx, &[product])
            .await?;

        if !existing.contains(&product) {
            return Err(CartsServiceError::ProductNotFound(product));
        }

        self.lock_cart(&mut tx, cart).await?;

        let added = self
            .items_repository
            .add_cart_item(&mut tx, cart, product, MAX_COUNT)
            .await?;

        if added == 0 {
            let mut violations = Violations::new();

            violations.push("quantity", format!("la cantidad no puede superar {MAX_COUNT}"));

            return Err(violations.into());
        }

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        debug!(cart = %cart, product = %product, "item added to cart");

        Ok(record)
    }

    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.lock_cart(&mut tx, cart).await?;

        self.items_repository
            .delete_cart_item(&mut tx, cart, product)
            .await?;

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn set_items(
        &self,
        cart: CartUuid,
        items: Vec<NewCartItem>,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.lock_cart(&mut tx, cart).await?;

        let requested: Vec<ProductUuid> = items.iter().map(|item| item.product_uuid).collect();

        let existing = self
            .products_repository
            .find_existing_products(&mut tx, &requested)
            .await?;

        let missing: FxHashSet<ProductUuid> = requested
            .into_iter()
            .filter(|product| !existing.contains(product))
            .collect();

        let valid = validate_items(&items, &missing)?;

        self.items_repository.clear_cart_items(&mut tx, cart).await?;

        for (product, quantity) in valid {
            self.items_repository
                .insert_cart_item(&mut tx, cart, product, quantity)
                .await?;
        }

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn set_item_quantity(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError> {
        let Some(quantity) = positive_quantity(quantity) else {
            let mut violations = Violations::new();

            violations.push("quantity", INVALID_QUANTITY);

            return Err(violations.into());
        };

        let mut tx = self.db.begin_transaction().await?;

        self.lock_cart(&mut tx, cart).await?;

        let rows_affected = self
            .items_repository
            .set_cart_item_quantity(&mut tx, cart, product, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound(product));
        }

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn clear(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        self.lock_cart(&mut tx, cart).await?;

        self.items_repository.clear_cart_items(&mut tx, cart).await?;

        let record = self.load_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a single cart with its items in insertion order.
    async fn get_cart(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;

    /// Creates a new, empty cart.
    async fn create_cart(&self, cart: NewCart) -> Result<CartRecord, CartsServiceError>;

    /// Deletes a cart with the given UUID.
    async fn delete_cart(&self, cart: CartUuid) -> Result<(), CartsServiceError>;

    /// Add one unit of a product, merging into an existing line.
    async fn add_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a product's line. Absent lines are not an error.
    async fn remove_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Replace every item, rejecting the whole payload if any entry is invalid.
    async fn set_items(
        &self,
        cart: CartUuid,
        items: Vec<NewCartItem>,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Overwrite the quantity of a product already in the cart.
    async fn set_item_quantity(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: i64,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Empty the cart, keeping the cart itself.
    async fn clear(&self, cart: CartUuid) -> Result<CartRecord, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{
        domain::products::ProductsService,
        test::{
            TestContext,
            helpers::{create_cart, create_product},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_cart_starts_empty() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CartUuid::new();

        let cart = ctx.carts.create_cart(NewCart { uuid }).await?;

        assert_eq!(cart.uuid, uuid);
        assert!(cart.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_cart_rejects_duplicate_uuid() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = CartUuid::new();

        ctx.carts.create_cart(NewCart { uuid }).await?;

        let result = ctx.carts.create_cart(NewCart { uuid }).await;

        assert!(matches!(result, Err(CartsServiceError::AlreadyExists)));

        Ok(())
    }

    #[tokio::test]
    async fn get_cart_returns_not_found_for_unknown_cart() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.get_cart(CartUuid::new()).await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));
    }

    #[tokio::test]
    async fn add_item_merges_repeated_products() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;
        let updated = ctx.carts.add_item(cart.uuid, product.uuid).await?;

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.quantity_of(product.uuid), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_keeps_insertion_order() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let first = create_product(&ctx, 100, 10).await?;
        let second = create_product(&ctx, 200, 10).await?;

        ctx.carts.add_item(cart.uuid, second.uuid).await?;
        ctx.carts.add_item(cart.uuid, first.uuid).await?;
        let updated = ctx.carts.add_item(cart.uuid, second.uuid).await?;

        let order: Vec<_> = updated.items.iter().map(|i| i.product_uuid).collect();

        assert_eq!(order, [second.uuid, first.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_unknown_product() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = ProductUuid::new();

        let result = ctx.carts.add_item(cart.uuid, product).await;

        assert!(matches!(
            result,
            Err(CartsServiceError::ProductNotFound(p)) if p == product
        ));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_unknown_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let product = create_product(&ctx, 100, 10).await?;

        let result = ctx.carts.add_item(CartUuid::new(), product.uuid).await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        let mut adds = JoinSet::new();

        for _ in 0..8 {
            let carts = ctx.carts.clone();

            adds.spawn(async move { carts.add_item(cart.uuid, product.uuid).await });
        }

        while let Some(result) = adds.join_next().await {
            result??;
        }

        let cart = ctx.carts.get_cart(cart.uuid).await?;

        assert_eq!(cart.quantity_of(product.uuid), Some(8));

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_is_a_no_op_when_absent() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        let unchanged = ctx.carts.remove_item(cart.uuid, ProductUuid::new()).await?;

        assert_eq!(unchanged.items.len(), 1);

        let emptied = ctx.carts.remove_item(cart.uuid, product.uuid).await?;

        assert!(emptied.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_drops_lines_for_deleted_products() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;
        ctx.products.delete_product(product.uuid).await?;

        let emptied = ctx.carts.remove_item(cart.uuid, product.uuid).await?;

        assert!(emptied.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn set_items_replaces_contents() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let old = create_product(&ctx, 100, 10).await?;
        let new = create_product(&ctx, 200, 10).await?;

        ctx.carts.add_item(cart.uuid, old.uuid).await?;

        let replaced = ctx
            .carts
            .set_items(
                cart.uuid,
                vec![NewCartItem {
                    product_uuid: new.uuid,
                    quantity: 3,
                }],
            )
            .await?;

        assert_eq!(replaced.items.len(), 1);
        assert_eq!(replaced.quantity_of(new.uuid), Some(3));
        assert_eq!(replaced.quantity_of(old.uuid), None);

        Ok(())
    }

    #[tokio::test]
    async fn set_items_reports_all_violations_and_keeps_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        let result = ctx
            .carts
            .set_items(
                cart.uuid,
                vec![
                    NewCartItem {
                        product_uuid: product.uuid,
                        quantity: -1,
                    },
                    NewCartItem {
                        product_uuid: ProductUuid::new(),
                        quantity: 1,
                    },
                ],
            )
            .await;

        let Err(CartsServiceError::Validation(violations)) = result else {
            panic!("expected validation error, got {result:?}");
        };

        assert_eq!(violations.len(), 2);

        let cart = ctx.carts.get_cart(cart.uuid).await?;

        assert_eq!(cart.quantity_of(product.uuid), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_overwrites_existing_line() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        let updated = ctx
            .carts
            .set_item_quantity(cart.uuid, product.uuid, 7)
            .await?;

        assert_eq!(updated.quantity_of(product.uuid), Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_does_not_insert() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        let result = ctx
            .carts
            .set_item_quantity(cart.uuid, product.uuid, 2)
            .await;

        assert!(matches!(result, Err(CartsServiceError::ItemNotFound(_))));
        assert!(ctx.carts.get_cart(cart.uuid).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_rejects_non_positive_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        for quantity in [0, -3] {
            let result = ctx
                .carts
                .set_item_quantity(cart.uuid, product.uuid, quantity)
                .await;

            assert!(matches!(result, Err(CartsServiceError::Validation(_))));
        }

        Ok(())
    }

    #[tokio::test]
    async fn add_item_stops_at_integer_column_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;
        ctx.carts
            .set_item_quantity(cart.uuid, product.uuid, i64::from(MAX_COUNT))
            .await?;

        let result = ctx.carts.add_item(cart.uuid, product.uuid).await;

        assert!(matches!(result, Err(CartsServiceError::Validation(_))));

        let items = ctx.carts.get_cart(cart.uuid).await?.items;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, MAX_COUNT);

        Ok(())
    }

    #[tokio::test]
    async fn set_item_quantity_rejects_quantity_beyond_integer_column() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        let result = ctx
            .carts
            .set_item_quantity(cart.uuid, product.uuid, 2_147_483_648)
            .await;

        assert!(matches!(result, Err(CartsServiceError::Validation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn clear_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;

        let once = ctx.carts.clear(cart.uuid).await?;
        let twice = ctx.carts.clear(cart.uuid).await?;

        assert!(once.items.is_empty());
        assert!(twice.items.is_empty());
        assert_eq!(ctx.carts.get_cart(cart.uuid).await?.uuid, cart.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn clear_fails_for_unknown_cart() {
        let ctx = TestContext::new().await;

        let result = ctx.carts.clear(CartUuid::new()).await;

        assert!(matches!(result, Err(CartsServiceError::NotFound)));
    }

    #[tokio::test]
    async fn delete_cart_removes_cart_and_items() -> TestResult {
        let ctx = TestContext::new().await;
        let cart = create_cart(&ctx).await?;
        let product = create_product(&ctx, 100, 10).await?;

        ctx.carts.add_item(cart.uuid, product.uuid).await?;
        ctx.carts.delete_cart(cart.uuid).await?;

        assert!(matches!(
            ctx.carts.get_cart(cart.uuid).await,
            Err(CartsServiceError::NotFound)
        ));

        assert!(matches!(
            ctx.carts.delete_cart(cart.uuid).await,
            Err(CartsServiceError::NotFound)
        ));

        Ok(())
    }
}
