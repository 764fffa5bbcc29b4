//! Ticket Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Ticket UUID
pub type TicketUuid = TypedUuid<TicketRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TicketStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TicketStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown ticket status `{0}`")]
pub struct UnknownTicketStatus(pub String);

impl FromStr for TicketStatus {
    type Err = UnknownTicketStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownTicketStatus(other.to_string())),
        }
    }
}

/// Ticket Record
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRecord {
    pub uuid: TicketUuid,
    pub code: String,
    pub purchase_datetime: Timestamp,
    /// Sum of line subtotals, in minor units.
    pub amount: u64,
    /// Email of the buyer.
    pub purchaser: String,
    pub items: Vec<TicketItemRecord>,
    pub status: TicketStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TicketRecord {
    /// Units purchased across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Ticket line, frozen at purchase time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketItemRecord {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

/// Aggregate figures over the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketStats {
    pub total_tickets: u64,
    pub total_revenue: u64,
    /// Mean ticket amount, rounded to the nearest minor unit.
    pub avg_order_value: u64,
    pub total_line_items: u64,
    pub by_status: FxHashMap<TicketStatus, u64>,
}
