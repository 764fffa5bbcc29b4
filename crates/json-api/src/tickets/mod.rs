//! Tickets and checkout

pub(crate) mod errors;
mod handlers;
pub(crate) mod responses;

pub(crate) use handlers::*;

use mercado_app::{auth::Identity, domain::tickets::records::TicketRecord};

use crate::envelope::ApiError;

/// Buyers see their own tickets; admins see every ticket.
fn ensure_visible(identity: &Identity, ticket: &TicketRecord) -> Result<(), ApiError> {
    if identity.is_admin() || ticket.purchaser.eq_ignore_ascii_case(&identity.email) {
        Ok(())
    } else {
        tracing::warn!(
            user_uuid = %identity.user_uuid,
            ticket_uuid = %ticket.uuid,
            "ticket access refused"
        );

        Err(ApiError::forbidden("No tiene permiso para ver este ticket"))
    }
}
