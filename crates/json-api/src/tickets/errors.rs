//! Errors

use tracing::error;

use mercado_app::domain::{checkout::CheckoutServiceError, tickets::TicketsServiceError};

use crate::{envelope::ApiError, tickets::responses::UnavailableProductResponse};

pub(crate) fn checkout_error(error: CheckoutServiceError) -> ApiError {
    match error {
        CheckoutServiceError::CartNotFound => ApiError::not_found("Carrito no encontrado"),
        CheckoutServiceError::EmptyCart => ApiError::bad_request("carrito vacío"),
        CheckoutServiceError::NothingAvailable { unavailable } => {
            ApiError::conflict("No se pudo comprar ningún producto del carrito").with_unavailable(
                unavailable
                    .into_iter()
                    .map(UnavailableProductResponse::from)
                    .collect(),
            )
        }
        CheckoutServiceError::Validation(violations) => ApiError::validation(&violations),
        CheckoutServiceError::StockConflict(product) => {
            error!(product_uuid = %product, "stock changed during checkout");

            ApiError::conflict("El stock cambió durante la compra, intente nuevamente")
        }
        CheckoutServiceError::DuplicateTicketCode => {
            error!("ticket code collision during checkout");

            ApiError::conflict("No se pudo emitir el ticket, intente nuevamente")
        }
        CheckoutServiceError::Sql(source) => {
            error!("checkout storage failure: {source}");

            ApiError::internal()
        }
    }
}

pub(crate) fn into_api_error(error: TicketsServiceError) -> ApiError {
    match error {
        TicketsServiceError::NotFound => ApiError::not_found("Ticket no encontrado"),
        TicketsServiceError::AlreadyExists => ApiError::conflict("El ticket ya existe"),
        TicketsServiceError::Validation(violations) => ApiError::validation(&violations),
        TicketsServiceError::MissingRequiredData | TicketsServiceError::InvalidData => {
            ApiError::bad_request("Datos del ticket inválidos")
        }
        TicketsServiceError::Sql(source) => {
            error!("ticket storage failure: {source}");

            ApiError::internal()
        }
    }
}
