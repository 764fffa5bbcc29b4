//! Test context for service-level integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::{
    auth::{OpenBaoError, PgAuthService, TokenVerifier},
    database::Db,
    domain::{
        carts::PgCartsService,
        checkout::PgCheckoutService,
        password_resets::{NotifierError, PgPasswordResetsService, ResetNotice, ResetNotifier},
        products::PgProductsService,
        tickets::PgTicketsService,
        users::PgUsersService,
    },
};

use super::db::TestDb;

/// Deterministic stand-in for OpenBao transit HMACs.
#[derive(Debug, Default)]
pub(crate) struct FakeVerifier;

#[async_trait]
impl TokenVerifier for FakeVerifier {
    async fn sign(&self, input: &[u8]) -> Result<String, OpenBaoError> {
        Ok(format!("fake:v1:{}", BASE64.encode(input)))
    }

    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, OpenBaoError> {
        Ok(self.sign(input).await? == verifier)
    }
}

/// Keeps every reset notice so tests can read the raw token back.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<ResetNotice>>,
}

impl RecordingNotifier {
    pub(crate) fn last(&self) -> Option<ResetNotice> {
        self.notices.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ResetNotifier for RecordingNotifier {
    async fn send(&self, notice: ResetNotice) -> Result<(), NotifierError> {
        self.notices.lock().unwrap().push(notice);

        Ok(())
    }
}

pub(crate) struct TestContext {
    pub db: TestDb,
    pub products: PgProductsService,
    pub carts: PgCartsService,
    pub checkout: PgCheckoutService,
    pub tickets: PgTicketsService,
    pub users: PgUsersService,
    pub auth: PgAuthService,
    pub password_resets: PgPasswordResetsService,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let verifier: Arc<dyn TokenVerifier> = Arc::new(FakeVerifier);
        let notifier = Arc::new(RecordingNotifier::default());

        Self {
            products: PgProductsService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            checkout: PgCheckoutService::new(db.clone()),
            tickets: PgTicketsService::new(db.clone()),
            users: PgUsersService::new(db.clone()),
            auth: PgAuthService::new(db.clone(), Arc::clone(&verifier)),
            password_resets: PgPasswordResetsService::new(
                db,
                verifier,
                Arc::clone(&notifier) as Arc<dyn ResetNotifier>,
            ),
            notifier,
            db: test_db,
        }
    }
}
