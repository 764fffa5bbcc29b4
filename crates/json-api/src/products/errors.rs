//! Product Errors

use tracing::error;

use mercado_app::domain::products::ProductsServiceError;

use crate::envelope::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::AlreadyExists => {
            ApiError::conflict("Ya existe un producto con ese código")
        }
        ProductsServiceError::NotFound => ApiError::not_found("Producto no encontrado"),
        ProductsServiceError::Validation(violations) => ApiError::validation(&violations),
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => ApiError::bad_request("Datos del producto inválidos"),
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            ApiError::internal()
        }
    }
}
