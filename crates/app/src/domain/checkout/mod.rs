//! Checkout
//!
//! Turns a cart into a ticket. Lines whose product is missing or short on
//! stock stay in the cart and are reported back; the rest are bought.

pub mod errors;
pub mod outcome;
pub mod partition;
pub mod service;

pub use errors::CheckoutServiceError;
pub use service::*;
