//! Authentication: password hashing, bearer sessions, and token codecs.

mod errors;
mod models;
pub mod openbao;
pub mod password;
mod repository;
mod service;
mod token;
mod verifier;

pub use errors::*;
pub use models::*;
pub use openbao::{OpenBaoClient, OpenBaoConfig, OpenBaoError};
pub use password::{MIN_PASSWORD_LENGTH, PasswordError, hash_password, verify_password};
pub(crate) use repository::PgSessionsRepository;
pub use service::*;
pub use token::*;
pub use verifier::*;
