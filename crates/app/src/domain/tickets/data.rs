//! Ticket Data

use jiff::Timestamp;

use crate::{
    domain::{
        products::records::ProductUuid,
        tickets::records::{TicketStatus, TicketUuid},
    },
    validation::Violations,
};

/// New Ticket Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub uuid: TicketUuid,
    pub code: String,
    pub purchase_datetime: Timestamp,
    pub amount: u64,
    pub purchaser: String,
    pub status: TicketStatus,
    pub items: Vec<NewTicketItem>,
}

/// New Ticket Line Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicketItem {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub price: u64,
    pub quantity: u32,
}

impl NewTicketItem {
    /// `price × quantity`, or `None` on overflow.
    #[must_use]
    pub fn subtotal(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}

/// Sum the subtotals of `items`, or `None` on overflow.
#[must_use]
pub fn total_amount(items: &[NewTicketItem]) -> Option<u64> {
    items
        .iter()
        .try_fold(0_u64, |total, item| total.checked_add(item.subtotal()?))
}

impl NewTicket {
    /// Check the receipt is self-consistent, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns the violations when a required field is blank, a line has a
    /// zero price or quantity, or `amount` differs from the line total.
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();

        violations.require_text("code", &self.code);
        violations.require_text("purchaser", &self.purchaser);

        if self.amount == 0 {
            violations.push("amount", "el monto debe ser mayor a 0");
        }

        if self.items.is_empty() {
            violations.push("items", "el ticket debe tener al menos un producto");
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.title.trim().is_empty() {
                violations.push(format!("items[{index}].title"), "el título es obligatorio");
            }

            if item.price == 0 {
                violations.push(
                    format!("items[{index}].price"),
                    "el precio debe ser mayor a 0",
                );
            }

            if item.quantity == 0 {
                violations.push(
                    format!("items[{index}].quantity"),
                    "la cantidad debe ser mayor a 0",
                );
            }
        }

        match total_amount(&self.items) {
            Some(total) if total == self.amount => violations.check_amount("amount", total),
            Some(total) => violations.push(
                "amount",
                format!("el monto {} no coincide con el total {total}", self.amount),
            ),
            None => violations.push("amount", "el monto excede el máximo permitido"),
        }

        violations.into_result()
    }
}

/// Admin listing filter. Both criteria are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    /// Case-insensitive substring of the purchaser email.
    pub purchaser: Option<String>,
}

/// Escape `LIKE` wildcards and wrap the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);

    pattern.push('%');

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(c);
    }

    pattern.push('%');

    pattern
}
