//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService, TokenVerifier},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        checkout::{CheckoutService, PgCheckoutService},
        password_resets::{PasswordResetsService, PgPasswordResetsService, ResetNotifier},
        products::{PgProductsService, ProductsService},
        tickets::{PgTicketsService, TicketsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub tickets: Arc<dyn TicketsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub password_resets: Arc<dyn PasswordResetsService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire every Postgres-backed service onto one pool.
    #[must_use]
    pub fn new(
        db: &Db,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            checkout: Arc::new(PgCheckoutService::new(db.clone())),
            tickets: Arc::new(PgTicketsService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone(), Arc::clone(&verifier))),
            password_resets: Arc::new(PgPasswordResetsService::new(db.clone(), verifier, notifier)),
        }
    }

    /// Build application context from a database URL, applying pending
    /// migrations when `migrate` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(
        url: &str,
        migrate: bool,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        Ok(Self::new(&Db::new(pool), verifier, notifier))
    }
}
