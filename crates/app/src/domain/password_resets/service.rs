//! Password reset service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    auth::{
        PgSessionsRepository, TokenKind, TokenSecret, TokenVerifier, TokenVersion,
        build_verifier_input, format_token, hash_password, parse_token, verify_password,
    },
    database::Db,
    domain::{
        password_resets::{
            ResetNotice, ResetNotifier,
            errors::PasswordResetsServiceError,
            records::{PasswordResetUuid, PendingReset},
            repository::PgPasswordResetsRepository,
        },
        users::{
            PgUsersRepository,
            data::{check_password, normalize_email},
        },
    },
    validation::Violations,
};

/// How long a reset token stays valid.
pub const RESET_LIFETIME: SignedDuration = SignedDuration::from_hours(1);

#[derive(Clone)]
pub struct PgPasswordResetsService {
    db: Db,
    repository: PgPasswordResetsRepository,
    users_repository: PgUsersRepository,
    sessions_repository: PgSessionsRepository,
    verifier: Arc<dyn TokenVerifier>,
    notifier: Arc<dyn ResetNotifier>,
}

impl fmt::Debug for PgPasswordResetsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPasswordResetsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgPasswordResetsService {
    #[must_use]
    pub fn new(
        db: Db,
        verifier: Arc<dyn TokenVerifier>,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        Self {
            db,
            repository: PgPasswordResetsRepository::new(),
            users_repository: PgUsersRepository::new(),
            sessions_repository: PgSessionsRepository::new(),
            verifier,
            notifier,
        }
    }

    /// Parse `token` and confirm it against a pending reset.
    ///
    /// With `lock` the reset and its user stay row-locked until `tx` ends.
    async fn check_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &str,
        lock: bool,
    ) -> Result<PendingReset, PasswordResetsServiceError> {
        let parsed = parse_token(TokenKind::PasswordReset, token).map_err(|error| {
            debug!(%error, "rejected malformed reset token");

            PasswordResetsServiceError::InvalidToken
        })?;

        let pending = if lock {
            self.repository.lock_pending_reset(tx, parsed.token_uuid).await?
        } else {
            self.repository.find_pending_reset(tx, parsed.token_uuid).await?
        };

        let Some(pending) = pending else {
            return Err(PasswordResetsServiceError::InvalidToken);
        };

        if pending.version != parsed.version {
            return Err(PasswordResetsServiceError::InvalidToken);
        }

        let input = build_verifier_input(
            parsed.token_uuid,
            parsed.version,
            pending.user_uuid,
            &parsed.secret,
        );

        if self.verifier.verify(&input, &pending.token_hash).await? {
            Ok(pending)
        } else {
            Err(PasswordResetsServiceError::InvalidToken)
        }
    }
}

#[async_trait]
impl PasswordResetsService for PgPasswordResetsService {
    async fn request_reset(&self, email: &str) -> Result<(), PasswordResetsServiceError> {
        let email = normalize_email(email);

        let mut tx = self.db.begin_transaction().await?;

        let Some(user) = self.users_repository.get_user_by_email(&mut tx, &email).await? else {
            debug!("password reset requested for unknown email");

            return Ok(());
        };

        self.repository.invalidate_pending(&mut tx, user.uuid).await?;

        let reset = PasswordResetUuid::new();
        let version = TokenVersion::V1;
        let secret = TokenSecret::generate();
        let expires_at = Timestamp::now() + RESET_LIFETIME;

        let token_hash = self
            .verifier
            .sign(&build_verifier_input(
                reset.into_uuid(),
                version,
                user.uuid,
                &secret,
            ))
            .await?;

        self.repository
            .create_reset(&mut tx, reset, user.uuid, version, &token_hash, expires_at)
            .await?;

        tx.commit().await?;

        self.notifier
            .send(ResetNotice {
                email: user.email,
                token: format_token(TokenKind::PasswordReset, reset.into_uuid(), version, &secret),
                expires_at,
            })
            .await?;

        Ok(())
    }

    async fn verify_reset(&self, token: &str) -> Result<String, PasswordResetsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let pending = self.check_token(&mut tx, token, false).await?;

        tx.commit().await?;

        Ok(pending.email)
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), PasswordResetsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let pending = self.check_token(&mut tx, token, true).await?;

        let mut violations = Violations::new();
        check_password(&mut violations, new_password);
        violations.into_result()?;

        if verify_password(new_password.to_string(), pending.password_hash.clone()).await? {
            return Err(PasswordResetsServiceError::PasswordReused);
        }

        let password_hash = hash_password(new_password.to_string()).await?;

        self.users_repository
            .update_password(&mut tx, pending.user_uuid, &password_hash)
            .await?;

        self.repository.mark_used(&mut tx, pending.uuid).await?;
        self.repository
            .invalidate_pending(&mut tx, pending.user_uuid)
            .await?;

        let revoked = self
            .sessions_repository
            .revoke_user_sessions(&mut tx, pending.user_uuid)
            .await?;

        tx.commit().await?;

        info!(user = %pending.user_uuid, revoked_sessions = revoked, "password reset completed");

        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, PasswordResetsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let purged = self.repository.purge(&mut tx).await?;

        tx.commit().await?;

        Ok(purged)
    }
}

#[automock]
#[async_trait]
pub trait PasswordResetsService: Send + Sync {
    /// Issue a reset token for `email` and hand it to the notifier.
    ///
    /// Unknown emails succeed without doing anything.
    async fn request_reset(&self, email: &str) -> Result<(), PasswordResetsServiceError>;

    /// The email a still-valid reset token belongs to.
    async fn verify_reset(&self, token: &str) -> Result<String, PasswordResetsServiceError>;

    /// Consume `token` and set a new password, revoking every session of the
    /// user.
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), PasswordResetsServiceError>;

    /// Delete used and expired resets, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, PasswordResetsServiceError>;
}
