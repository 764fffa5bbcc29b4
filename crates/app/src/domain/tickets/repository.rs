//! Tickets Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, count_to_i32, try_get_amount, try_get_count},
    domain::{
        products::records::ProductUuid,
        tickets::{
            data::{NewTicket, like_pattern},
            records::{TicketItemRecord, TicketRecord, TicketStats, TicketStatus, TicketUuid},
        },
    },
    pagination::PageRequest,
};

const CREATE_TICKET_SQL: &str = include_str!("sql/create_ticket.sql");
const CREATE_TICKET_ITEM_SQL: &str = include_str!("sql/create_ticket_item.sql");
const GET_TICKET_SQL: &str = include_str!("sql/get_ticket.sql");
const GET_TICKET_BY_CODE_SQL: &str = include_str!("sql/get_ticket_by_code.sql");
const GET_TICKET_ITEMS_SQL: &str = include_str!("sql/get_ticket_items.sql");
const LIST_TICKETS_SQL: &str = include_str!("sql/list_tickets.sql");
const COUNT_TICKETS_SQL: &str = include_str!("sql/count_tickets.sql");
const TICKET_TOTALS_SQL: &str = include_str!("sql/ticket_totals.sql");
const COUNT_TICKETS_BY_STATUS_SQL: &str = include_str!("sql/count_tickets_by_status.sql");

/// Purchaser criteria as bound into the listing queries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PurchaserMatch<'a> {
    Any,
    Exact(&'a str),
    Contains(&'a str),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTicketsRepository;

impl PgTicketsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert the ticket and its lines, in line order.
    pub(crate) async fn create_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: &NewTicket,
    ) -> Result<TicketRecord, sqlx::Error> {
        let mut created = query_as::<Postgres, TicketRecord>(CREATE_TICKET_SQL)
            .bind(ticket.uuid.into_uuid())
            .bind(&ticket.code)
            .bind(SqlxTimestamp::from(ticket.purchase_datetime))
            .bind(amount_to_i64(ticket.amount, "amount")?)
            .bind(&ticket.purchaser)
            .bind(ticket.status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        for (position, item) in ticket.items.iter().enumerate() {
            let subtotal = item.subtotal().ok_or_else(|| {
                sqlx::Error::Encode(format!("subtotal overflow at line {position}").into())
            })?;

            let position = i32::try_from(position)
                .map_err(|e| sqlx::Error::Encode(format!("position: {e}").into()))?;

            query(CREATE_TICKET_ITEM_SQL)
                .bind(ticket.uuid.into_uuid())
                .bind(position)
                .bind(item.product_uuid.into_uuid())
                .bind(&item.title)
                .bind(amount_to_i64(item.price, "price")?)
                .bind(count_to_i32(item.quantity, "quantity")?)
                .bind(amount_to_i64(subtotal, "subtotal")?)
                .execute(&mut **tx)
                .await?;

            created.items.push(TicketItemRecord {
                product_uuid: item.product_uuid,
                title: item.title.clone(),
                price: item.price,
                quantity: item.quantity,
                subtotal,
            });
        }

        Ok(created)
    }

    pub(crate) async fn get_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, sqlx::Error> {
        let record = query_as::<Postgres, TicketRecord>(GET_TICKET_SQL)
            .bind(ticket.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, vec![record])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn get_ticket_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<TicketRecord, sqlx::Error> {
        let record = query_as::<Postgres, TicketRecord>(GET_TICKET_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await?;

        self.with_items(tx, vec![record])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Newest first.
    pub(crate) async fn list_tickets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<TicketStatus>,
        purchaser: PurchaserMatch<'_>,
        request: PageRequest,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        let (exact, pattern) = purchaser_binds(purchaser);

        let records = query_as::<Postgres, TicketRecord>(LIST_TICKETS_SQL)
            .bind(i64::from(request.limit()))
            .bind(request.offset())
            .bind(status.map(TicketStatus::as_str))
            .bind(exact)
            .bind(pattern)
            .fetch_all(&mut **tx)
            .await?;

        self.with_items(tx, records).await
    }

    pub(crate) async fn count_tickets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<TicketStatus>,
        purchaser: PurchaserMatch<'_>,
    ) -> Result<u64, sqlx::Error> {
        let (exact, pattern) = purchaser_binds(purchaser);

        let total: i64 = query_scalar(COUNT_TICKETS_SQL)
            .bind(status.map(TicketStatus::as_str))
            .bind(exact)
            .bind(pattern)
            .fetch_one(&mut **tx)
            .await?;

        Ok(total.unsigned_abs())
    }

    pub(crate) async fn ticket_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<TicketStats, sqlx::Error> {
        let row = query(TICKET_TOTALS_SQL).fetch_one(&mut **tx).await?;

        let mut stats = TicketStats {
            total_tickets: try_get_amount(&row, "total_tickets")?,
            total_revenue: try_get_amount(&row, "total_revenue")?,
            avg_order_value: try_get_amount(&row, "avg_order_value")?,
            total_line_items: try_get_amount(&row, "total_line_items")?,
            by_status: TicketStatus::ALL.into_iter().map(|s| (s, 0)).collect(),
        };

        for row in query(COUNT_TICKETS_BY_STATUS_SQL)
            .fetch_all(&mut **tx)
            .await?
        {
            let status = decode_status(&row)?;

            stats.by_status.insert(status, try_get_amount(&row, "total")?);
        }

        Ok(stats)
    }

    async fn with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut records: Vec<TicketRecord>,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        if records.is_empty() {
            return Ok(records);
        }

        let uuids: Vec<Uuid> = records.iter().map(|r| r.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, TicketItemRow>(GET_TICKET_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut items: FxHashMap<TicketUuid, Vec<TicketItemRecord>> = FxHashMap::default();

        for row in rows {
            items.entry(row.ticket_uuid).or_default().push(row.item);
        }

        for record in &mut records {
            record.items = items.remove(&record.uuid).unwrap_or_default();
        }

        Ok(records)
    }
}

fn purchaser_binds(purchaser: PurchaserMatch<'_>) -> (Option<&str>, Option<String>) {
    match purchaser {
        PurchaserMatch::Any => (None, None),
        PurchaserMatch::Exact(email) => (Some(email), None),
        PurchaserMatch::Contains(term) => (None, Some(like_pattern(term))),
    }
}

fn decode_status(row: &PgRow) -> Result<TicketStatus, sqlx::Error> {
    let status: String = row.try_get("status")?;

    status.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

struct TicketItemRow {
    ticket_uuid: TicketUuid,
    item: TicketItemRecord,
}

impl<'r> FromRow<'r, PgRow> for TicketItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            ticket_uuid: TicketUuid::from_uuid(row.try_get("ticket_uuid")?),
            item: TicketItemRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                title: row.try_get("title")?,
                price: try_get_amount(row, "price")?,
                quantity: try_get_count(row, "quantity")?,
                subtotal: try_get_amount(row, "subtotal")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TicketRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: TicketUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            purchase_datetime: row
                .try_get::<SqlxTimestamp, _>("purchase_datetime")?
                .to_jiff(),
            amount: try_get_amount(row, "amount")?,
            purchaser: row.try_get("purchaser")?,
            items: Vec::new(),
            status: decode_status(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
