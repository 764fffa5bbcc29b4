//! Errors

use tracing::error;

use mercado_app::domain::carts::CartsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::AlreadyExists => ApiError::conflict("El carrito ya existe"),
        CartsServiceError::NotFound => ApiError::not_found("Carrito no encontrado"),
        CartsServiceError::ProductNotFound(_) => ApiError::not_found("Producto no encontrado"),
        CartsServiceError::ItemNotFound(_) => {
            ApiError::not_found("Producto no encontrado en el carrito")
        }
        CartsServiceError::Validation(violations) => ApiError::validation(&violations),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => ApiError::bad_request("Datos del carrito inválidos"),
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            ApiError::internal()
        }
    }
}
