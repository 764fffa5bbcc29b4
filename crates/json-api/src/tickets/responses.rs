//! Ticket response bodies

use salvo::oapi::ToSchema;
use serde::Serialize;
use uuid::Uuid;

use mercado_app::domain::{
    checkout::outcome::{CheckoutOutcome, CheckoutSummary, UnavailableProduct},
    tickets::records::{TicketItemRecord, TicketRecord, TicketStats, TicketStatus},
};

/// Ticket Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TicketResponse {
    pub id: Uuid,

    /// Human-readable ticket code
    pub code: String,

    pub purchase_datetime: String,

    /// Sum of every line subtotal, in minor units
    pub amount: u64,

    /// Email of the buyer
    pub purchaser: String,

    /// `pending`, `completed` or `cancelled`
    pub status: String,

    pub items: Vec<TicketItemResponse>,

    pub created_at: String,
}

impl From<TicketRecord> for TicketResponse {
    fn from(ticket: TicketRecord) -> Self {
        Self {
            id: ticket.uuid.into_uuid(),
            code: ticket.code,
            purchase_datetime: ticket.purchase_datetime.to_string(),
            amount: ticket.amount,
            purchaser: ticket.purchaser,
            status: ticket.status.as_str().to_string(),
            items: ticket.items.into_iter().map(Into::into).collect(),
            created_at: ticket.created_at.to_string(),
        }
    }
}

/// A purchased line, priced as it was at checkout.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TicketItemResponse {
    pub product: Uuid,
    pub title: String,
    pub price: u64,
    pub quantity: u32,
    pub subtotal: u64,
}

impl From<TicketItemRecord> for TicketItemResponse {
    fn from(item: TicketItemRecord) -> Self {
        Self {
            product: item.product_uuid.into_uuid(),
            title: item.title,
            price: item.price,
            quantity: item.quantity,
            subtotal: item.subtotal,
        }
    }
}

/// A cart line checkout could not buy.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UnavailableProductResponse {
    pub product: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub requested: u32,

    /// Why the line was left in the cart
    pub reason: String,
}

impl From<UnavailableProduct> for UnavailableProductResponse {
    fn from(product: UnavailableProduct) -> Self {
        Self {
            product: product.product_uuid.into_uuid(),
            title: product.title,
            requested: product.requested,
            reason: product.reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutSummaryResponse {
    /// Number of cart lines bought
    pub total_purchased: usize,
    pub total_amount: u64,
    /// Lines left in the cart
    pub remaining_in_cart: usize,
}

impl From<CheckoutSummary> for CheckoutSummaryResponse {
    fn from(summary: CheckoutSummary) -> Self {
        Self {
            total_purchased: summary.total_purchased,
            total_amount: summary.total_amount,
            remaining_in_cart: summary.remaining_in_cart,
        }
    }
}

/// Checkout Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckoutResponse {
    pub ticket: TicketResponse,
    pub summary: CheckoutSummaryResponse,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_products: Vec<UnavailableProductResponse>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        Self {
            ticket: outcome.ticket.into(),
            summary: outcome.summary.into(),
            unavailable_products: outcome.unavailable.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ticket counts per status.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct StatusCountsResponse {
    pub pending: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Ledger Stats Response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TicketStatsResponse {
    pub total_tickets: u64,
    pub total_revenue: u64,
    pub avg_order_value: u64,
    pub total_line_items: u64,
    pub by_status: StatusCountsResponse,
}

impl From<TicketStats> for TicketStatsResponse {
    fn from(stats: TicketStats) -> Self {
        let count = |status: TicketStatus| stats.by_status.get(&status).copied().unwrap_or(0);

        Self {
            total_tickets: stats.total_tickets,
            total_revenue: stats.total_revenue,
            avg_order_value: stats.avg_order_value,
            total_line_items: stats.total_line_items,
            by_status: StatusCountsResponse {
                pending: count(TicketStatus::Pending),
                completed: count(TicketStatus::Completed),
                cancelled: count(TicketStatus::Cancelled),
            },
        }
    }
}
