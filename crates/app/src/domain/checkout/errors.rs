//! Checkout errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{checkout::outcome::UnavailableProduct, products::records::ProductUuid},
    validation::Violations,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart not found")]
    CartNotFound,

    #[error("carrito vacío")]
    EmptyCart,

    /// Every line was unavailable; nothing was bought.
    #[error("no products in the cart could be purchased")]
    NothingAvailable { unavailable: Vec<UnavailableProduct> },

    #[error("invalid ticket: {0}")]
    Validation(Violations),

    #[error("stock for product {0} changed during checkout")]
    StockConflict(ProductUuid),

    #[error("ticket code already issued")]
    DuplicateTicketCode,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateTicketCode,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<Violations> for CheckoutServiceError {
    fn from(violations: Violations) -> Self {
        Self::Validation(violations)
    }
}
