//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        carts::records::CartUuid,
        users::records::{Role, UserRecord, UserUuid},
    },
    pagination::PageRequest,
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const GET_USER_BY_EMAIL_SQL: &str = include_str!("sql/get_user_by_email.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const COUNT_USERS_SQL: &str = include_str!("sql/count_users.sql");
const UPDATE_USER_SQL: &str = include_str!("sql/update_user.sql");
const UPDATE_USER_ROLE_SQL: &str = include_str!("sql/update_user_role.sql");
const UPDATE_USER_PASSWORD_SQL: &str = include_str!("sql/update_user_password.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");
const ADMIN_EXISTS_SQL: &str = include_str!("sql/admin_exists.sql");

/// Column changes for an admin edit; `None` keeps the stored value.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UserChanges<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub age: Option<u32>,
    pub role: Option<Role>,
}

/// Row payload for a user insert; the password is already hashed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UserInsert<'a> {
    pub uuid: UserUuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub age: Option<u32>,
    pub password_hash: &'a str,
    pub cart_uuid: CartUuid,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserInsert<'_>,
    ) -> Result<UserRecord, sqlx::Error> {
        let age = encode_age(user.age)?;

        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.email)
            .bind(age)
            .bind(user.password_hash)
            .bind(user.cart_uuid.into_uuid())
            .bind(user.role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// `email` must already be normalized.
    pub(crate) async fn get_user_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: PageRequest,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_USERS_SQL)
            .bind(i64::from(request.limit()))
            .bind(request.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_users(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_USERS_SQL).fetch_one(&mut **tx).await?;

        Ok(total.unsigned_abs())
    }

    pub(crate) async fn update_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        changes: UserChanges<'_>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_SQL)
            .bind(user.into_uuid())
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.email)
            .bind(encode_age(changes.age)?)
            .bind(changes.role.map(Role::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: Role,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(UPDATE_USER_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_USER_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Delete the user row.
    ///
    /// Returns `None` when no such user exists, otherwise the cart the user
    /// owned (if any).
    pub(crate) async fn delete_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<Option<CartUuid>>, sqlx::Error> {
        let deleted: Option<Option<Uuid>> = query_scalar(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(deleted.map(|cart| cart.map(CartUuid::from_uuid)))
    }

    pub(crate) async fn admin_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(ADMIN_EXISTS_SQL).fetch_one(&mut **tx).await
    }
}

fn encode_age(age: Option<u32>) -> Result<Option<i32>, sqlx::Error> {
    age.map(i32::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::Encode(format!("age: {e}").into()))
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;
        let age: Option<i32> = row.try_get("age")?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            age: age
                .map(u32::try_from)
                .transpose()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "age".to_string(),
                    source: Box::new(e),
                })?,
            password_hash: row.try_get("password_hash")?,
            cart_uuid: row
                .try_get::<Option<Uuid>, _>("cart_uuid")?
                .map(CartUuid::from_uuid),
            role: role.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?,
            last_password_change: row
                .try_get::<Option<SqlxTimestamp>, _>("last_password_change")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
