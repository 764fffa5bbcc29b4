//! Tickets service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::tickets::{
        data::{NewTicket, TicketFilter},
        errors::TicketsServiceError,
        records::{TicketRecord, TicketStats, TicketUuid},
        repository::{PgTicketsRepository, PurchaserMatch},
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgTicketsService {
    db: Db,
    repository: PgTicketsRepository,
}

impl PgTicketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTicketsRepository::new(),
        }
    }
}

#[async_trait]
impl TicketsService for PgTicketsService {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, TicketsServiceError> {
        ticket.validate()?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_ticket(&mut tx, &ticket).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_ticket(&mut tx, ticket).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn get_ticket_by_code(&self, code: &str) -> Result<TicketRecord, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_ticket_by_code(&mut tx, code).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_tickets_for_purchaser(
        &self,
        purchaser: &str,
        request: PageRequest,
    ) -> Result<Page<TicketRecord>, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let matcher = PurchaserMatch::Exact(purchaser);

        let tickets = self
            .repository
            .list_tickets(&mut tx, None, matcher, request)
            .await?;

        let total = self.repository.count_tickets(&mut tx, None, matcher).await?;

        tx.commit().await?;

        Ok(Page::new(tickets, request, total))
    }

    async fn list_tickets(
        &self,
        filter: TicketFilter,
        request: PageRequest,
    ) -> Result<Page<TicketRecord>, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let matcher = match filter.purchaser.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => PurchaserMatch::Contains(term),
            _ => PurchaserMatch::Any,
        };

        let tickets = self
            .repository
            .list_tickets(&mut tx, filter.status, matcher, request)
            .await?;

        let total = self
            .repository
            .count_tickets(&mut tx, filter.status, matcher)
            .await?;

        tx.commit().await?;

        Ok(Page::new(tickets, request, total))
    }

    async fn ticket_stats(&self) -> Result<TicketStats, TicketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let stats = self.repository.ticket_stats(&mut tx).await?;

        tx.commit().await?;

        Ok(stats)
    }
}

#[automock]
#[async_trait]
pub trait TicketsService: Send + Sync {
    /// Validate and store a receipt with its lines.
    async fn create_ticket(&self, ticket: NewTicket) -> Result<TicketRecord, TicketsServiceError>;

    /// Retrieve a single ticket.
    async fn get_ticket(&self, ticket: TicketUuid) -> Result<TicketRecord, TicketsServiceError>;

    /// Retrieve a ticket by its human-readable code.
    async fn get_ticket_by_code(&self, code: &str) -> Result<TicketRecord, TicketsServiceError>;

    /// One page of a buyer's tickets, newest first.
    async fn list_tickets_for_purchaser(
        &self,
        purchaser: &str,
        request: PageRequest,
    ) -> Result<Page<TicketRecord>, TicketsServiceError>;

    /// One page of all tickets matching `filter`, newest first.
    async fn list_tickets(
        &self,
        filter: TicketFilter,
        request: PageRequest,
    ) -> Result<Page<TicketRecord>, TicketsServiceError>;

    /// Aggregate revenue and volume over the ledger.
    async fn ticket_stats(&self) -> Result<TicketStats, TicketsServiceError>;
}
