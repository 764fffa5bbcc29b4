//! Errors

use tracing::error;

use mercado_app::domain::password_resets::PasswordResetsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: PasswordResetsServiceError) -> ApiError {
    match error {
        PasswordResetsServiceError::InvalidToken => {
            ApiError::bad_request("El enlace es inválido o ha expirado")
        }
        PasswordResetsServiceError::PasswordReused => {
            ApiError::bad_request("La nueva contraseña no puede ser igual a la anterior")
        }
        PasswordResetsServiceError::Validation(violations) => ApiError::validation(&violations),
        PasswordResetsServiceError::Password(source) => {
            error!("password hashing failure during reset: {source}");

            ApiError::internal()
        }
        PasswordResetsServiceError::OpenBao(source) => {
            error!("OpenBao error during password reset: {source}");

            ApiError::internal()
        }
        PasswordResetsServiceError::Notifier(source) => {
            error!("failed to deliver password reset: {source}");

            ApiError::internal()
        }
        PasswordResetsServiceError::Sql(source) => {
            error!("password reset storage failure: {source}");

            ApiError::internal()
        }
    }
}
