//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use mercado_app::auth::Identity;

use crate::envelope::ApiError;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: Identity);

    /// The caller resolved by the auth middleware.
    fn identity_or_401(&self) -> Result<&Identity, ApiError>;

    /// The caller, provided they are an admin.
    fn admin_or_403(&self) -> Result<&Identity, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal())
    }

    fn insert_identity(&mut self, identity: Identity) {
        self.inject(identity);
    }

    fn identity_or_401(&self) -> Result<&Identity, ApiError> {
        self.obtain::<Identity>()
            .map_err(|_ignored| ApiError::unauthorized("No autenticado"))
    }

    fn admin_or_403(&self) -> Result<&Identity, ApiError> {
        let identity = self.identity_or_401()?;

        if identity.is_admin() {
            Ok(identity)
        } else {
            Err(ApiError::forbidden("Acceso denegado"))
        }
    }
}
