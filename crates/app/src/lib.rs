//! Shared application domain and persistence modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod pagination;
pub mod uuids;
pub mod validation;

#[cfg(test)]
mod test;
