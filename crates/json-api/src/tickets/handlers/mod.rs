//! Ticket handlers

pub(crate) mod admin_index;
pub(crate) mod admin_stats;
pub(crate) mod checkout;
pub(crate) mod get;
pub(crate) mod get_by_code;
pub(crate) mod mine;
