//! Password Resets Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::TokenVersion,
    domain::{
        password_resets::records::{PasswordResetUuid, PendingReset},
        users::records::UserUuid,
    },
};

const CREATE_PASSWORD_RESET_SQL: &str = include_str!("sql/create_password_reset.sql");
const FIND_PENDING_RESET_SQL: &str = include_str!("sql/find_pending_reset.sql");
const LOCK_PENDING_RESET_SQL: &str = include_str!("sql/lock_pending_reset.sql");
const MARK_RESET_USED_SQL: &str = include_str!("sql/mark_reset_used.sql");
const INVALIDATE_PENDING_RESETS_SQL: &str = include_str!("sql/invalidate_pending_resets.sql");
const PURGE_PASSWORD_RESETS_SQL: &str = include_str!("sql/purge_password_resets.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPasswordResetsRepository;

impl PgPasswordResetsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_reset(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reset: PasswordResetUuid,
        user: UserUuid,
        version: TokenVersion,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PASSWORD_RESET_SQL)
            .bind(reset.into_uuid())
            .bind(user.into_uuid())
            .bind(version.as_i16())
            .bind(token_hash)
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_pending_reset(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reset: Uuid,
    ) -> Result<Option<PendingReset>, sqlx::Error> {
        query_as::<Postgres, PendingReset>(FIND_PENDING_RESET_SQL)
            .bind(reset)
            .fetch_optional(&mut **tx)
            .await
    }

    /// As [`Self::find_pending_reset`], also locking the reset and user rows.
    pub(crate) async fn lock_pending_reset(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reset: Uuid,
    ) -> Result<Option<PendingReset>, sqlx::Error> {
        query_as::<Postgres, PendingReset>(LOCK_PENDING_RESET_SQL)
            .bind(reset)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn mark_used(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reset: PasswordResetUuid,
    ) -> Result<(), sqlx::Error> {
        query(MARK_RESET_USED_SQL)
            .bind(reset.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn invalidate_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INVALIDATE_PENDING_RESETS_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn purge(&self, tx: &mut Transaction<'_, Postgres>) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PURGE_PASSWORD_RESETS_SQL)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PendingReset {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let version: i16 = row.try_get("version")?;

        Ok(Self {
            uuid: PasswordResetUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            version: TokenVersion::try_from(version).map_err(|e| sqlx::Error::ColumnDecode {
                index: "version".to_string(),
                source: Box::new(e),
            })?,
            token_hash: row.try_get("token_hash")?,
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}
