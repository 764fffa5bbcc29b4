//! Session auth service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, Identity, IssuedSession, TokenKind, TokenSecret, TokenVerifier,
        TokenVersion, build_verifier_input, format_token, parse_token,
        repository::PgSessionsRepository,
    },
    database::Db,
    domain::users::records::UserUuid,
};

/// How long a session token stays valid.
pub const SESSION_LIFETIME: SignedDuration = SignedDuration::from_hours(24);

#[derive(Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgSessionsRepository,
    verifier: Arc<dyn TokenVerifier>,
}

impl fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAuthService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            db,
            repository: PgSessionsRepository::new(),
            verifier,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn issue_session(&self, user: UserUuid) -> Result<IssuedSession, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = TokenVersion::V1;
        let secret = TokenSecret::generate();
        let expires_at = Timestamp::now() + SESSION_LIFETIME;

        let token_hash = self
            .verifier
            .sign(&build_verifier_input(token_uuid, version, user, &secret))
            .await?;

        let mut tx = self.db.begin_transaction().await?;

        self.repository
            .create_session_token(&mut tx, token_uuid, user, version, &token_hash, expires_at)
            .await?;

        tx.commit().await?;

        info!(user = %user, session = %token_uuid, "session issued");

        Ok(IssuedSession {
            token: format_token(TokenKind::Session, token_uuid, version, &secret),
            expires_at,
        })
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let parsed = parse_token(TokenKind::Session, bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let mut tx = self.db.begin_transaction().await?;

        let session = self
            .repository
            .find_active_session(&mut tx, parsed.token_uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if session.version != parsed.version {
            return Err(AuthServiceError::NotFound);
        }

        let input = build_verifier_input(
            parsed.token_uuid,
            parsed.version,
            session.identity.user_uuid,
            &parsed.secret,
        );

        if !self.verifier.verify(&input, &session.token_hash).await? {
            warn!(session = %parsed.token_uuid, "bearer token failed verification");

            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self
            .repository
            .touch_last_used(&mut tx, parsed.token_uuid)
            .await
        {
            warn!(%error, session = %parsed.token_uuid, "failed to record session use");
        }

        tx.commit().await?;

        Ok(session.identity)
    }

    async fn revoke_sessions(&self, user: UserUuid) -> Result<u64, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let revoked = self.repository.revoke_user_sessions(&mut tx, user).await?;

        tx.commit().await?;

        Ok(revoked)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Issue a bearer token for `user`.
    async fn issue_session(&self, user: UserUuid) -> Result<IssuedSession, AuthServiceError>;

    /// Resolve a bearer token to its caller. Every failure mode is
    /// `NotFound` so callers cannot probe which check failed.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;

    /// Revoke every active session of `user`, returning how many were live.
    async fn revoke_sessions(&self, user: UserUuid) -> Result<u64, AuthServiceError>;
}
