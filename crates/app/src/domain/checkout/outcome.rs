//! Checkout results.

use std::fmt;

use crate::domain::{products::records::ProductUuid, tickets::records::TicketRecord};

/// Why a cart line could not be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    ProductNotFound,
    InsufficientStock { available: u32, requested: u32 },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductNotFound => f.write_str("Producto no encontrado"),
            Self::InsufficientStock {
                available,
                requested,
            } => write!(
                f,
                "Stock insuficiente. Disponible: {available}, solicitado: {requested}"
            ),
        }
    }
}

/// A cart line left behind by checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailableProduct {
    pub product_uuid: ProductUuid,
    /// Known only when the product still exists.
    pub title: Option<String>,
    pub requested: u32,
    pub reason: UnavailableReason,
}

/// Totals of a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    /// Number of cart lines bought.
    pub total_purchased: usize,
    pub total_amount: u64,
    /// Lines left in the cart.
    pub remaining_in_cart: usize,
}

/// A checkout that bought at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    pub ticket: TicketRecord,
    pub summary: CheckoutSummary,
    pub unavailable: Vec<UnavailableProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_reason_names_both_counts() {
        let reason = UnavailableReason::InsufficientStock {
            available: 2,
            requested: 10,
        };

        assert_eq!(
            reason.to_string(),
            "Stock insuficiente. Disponible: 2, solicitado: 10"
        );
    }
}
