//! Checkout service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::{PgCartItemsRepository, PgCartsRepository, records::CartUuid},
        checkout::{
            errors::CheckoutServiceError,
            outcome::{CheckoutOutcome, CheckoutSummary},
            partition::{Partition, partition},
        },
        products::{PgProductsRepository, records::ProductUuid},
        tickets::{
            PgTicketsRepository,
            code::generate_ticket_code,
            data::{NewTicket, total_amount},
            records::{TicketStatus, TicketUuid},
        },
    },
    validation::Violations,
};

#[derive(Debug, Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    tickets_repository: PgTicketsRepository,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            tickets_repository: PgTicketsRepository::new(),
        }
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn process_checkout(
        &self,
        cart: CartUuid,
        purchaser: &str,
    ) -> Result<CheckoutOutcome, CheckoutServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        if !self.carts_repository.lock_cart(&mut tx, cart).await? {
            return Err(CheckoutServiceError::CartNotFound);
        }

        let items = self.items_repository.get_cart_items(&mut tx, cart).await?;

        if items.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        let mut requested: Vec<ProductUuid> = items.iter().map(|item| item.product_uuid).collect();

        requested.sort_unstable();

        let products: FxHashMap<ProductUuid, _> = self
            .products_repository
            .lock_products(&mut tx, &requested)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let Partition {
            available,
            unavailable,
        } = partition(&items, &products);

        if available.is_empty() {
            info!(cart = %cart, unavailable = unavailable.len(), "checkout found nothing purchasable");

            return Err(CheckoutServiceError::NothingAvailable { unavailable });
        }

        let amount = total_amount(&available).ok_or_else(|| {
            let mut violations = Violations::new();

            violations.push("amount", "el monto excede el máximo permitido");

            violations
        })?;

        let now = Timestamp::now();

        let ticket = NewTicket {
            uuid: TicketUuid::new(),
            code: generate_ticket_code(now),
            purchase_datetime: now,
            amount,
            purchaser: purchaser.to_string(),
            status: TicketStatus::Completed,
            items: available,
        };

        ticket.validate()?;

        let created = self.tickets_repository.create_ticket(&mut tx, &ticket).await?;

        for item in &ticket.items {
            let rows_affected = self
                .products_repository
                .decrement_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;

            if rows_affected == 0 {
                warn!(cart = %cart, product = %item.product_uuid, "stock moved under a held lock");

                return Err(CheckoutServiceError::StockConflict(item.product_uuid));
            }
        }

        let purchased: Vec<ProductUuid> = ticket.items.iter().map(|i| i.product_uuid).collect();

        self.items_repository
            .delete_cart_items(&mut tx, cart, &purchased)
            .await?;

        tx.commit().await?;

        info!(
            cart = %cart,
            ticket = %created.code,
            amount,
            purchased = purchased.len(),
            unavailable = unavailable.len(),
            "checkout completed"
        );

        Ok(CheckoutOutcome {
            summary: CheckoutSummary {
                total_purchased: purchased.len(),
                total_amount: amount,
                remaining_in_cart: unavailable.len(),
            },
            ticket: created,
            unavailable,
        })
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Buy every purchasable line of `cart` on behalf of `purchaser`.
    ///
    /// Ticket creation, stock decrements and cart pruning commit together or
    /// not at all.
    async fn process_checkout(
        &self,
        cart: CartUuid,
        purchaser: &str,
    ) -> Result<CheckoutOutcome, CheckoutServiceError>;
}
