//! Password Resets

pub mod errors;
pub mod notifier;
pub mod records;
mod repository;
pub mod service;

pub use errors::PasswordResetsServiceError;
pub use notifier::*;
pub use service::*;
