//! Mercado Domain Concerns

pub mod carts;
pub mod checkout;
pub mod password_resets;
pub mod products;
pub mod tickets;
pub mod users;
