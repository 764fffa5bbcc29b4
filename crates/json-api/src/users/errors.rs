//! Errors

use tracing::error;

use mercado_app::{auth::AuthServiceError, domain::users::UsersServiceError};

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: UsersServiceError) -> ApiError {
    match error {
        UsersServiceError::AlreadyExists => ApiError::conflict("El email ya está registrado"),
        UsersServiceError::NotFound => ApiError::not_found("Usuario no encontrado"),
        UsersServiceError::InvalidCredentials => ApiError::unauthorized("Credenciales inválidas"),
        UsersServiceError::Validation(violations) => ApiError::validation(&violations),
        UsersServiceError::InvalidReference
        | UsersServiceError::MissingRequiredData
        | UsersServiceError::InvalidData => ApiError::bad_request("Datos de usuario inválidos"),
        UsersServiceError::Password(source) => {
            error!("password hashing failure: {source}");

            ApiError::internal()
        }
        UsersServiceError::Sql(source) => {
            error!("user storage failure: {source}");

            ApiError::internal()
        }
    }
}

/// Session issuance and revocation never expose why they failed.
pub(crate) fn session_error(error: AuthServiceError) -> ApiError {
    error!("session failure: {error}");

    ApiError::internal()
}
