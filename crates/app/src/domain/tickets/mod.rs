//! Tickets
//!
//! Append-only purchase receipts. A ticket snapshots title and price of each
//! purchased product so later catalog edits never change what was paid.

pub mod code;
pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::TicketsServiceError;
pub(crate) use repository::PgTicketsRepository;
pub use service::*;
