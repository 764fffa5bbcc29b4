//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{hash_password, verify_password},
    database::Db,
    domain::{
        carts::{PgCartsRepository, records::CartUuid},
        users::{
            data::{NewUser, UserUpdate, normalize_email},
            errors::UsersServiceError,
            records::{Role, UserRecord, UserUuid},
            repository::{PgUsersRepository, UserChanges, UserInsert},
        },
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
    carts_repository: PgCartsRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
            carts_repository: PgCartsRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        user.validate()?;

        let email = normalize_email(&user.email);
        let password_hash = hash_password(user.password.clone()).await?;

        let mut tx = self.db.begin_transaction().await?;

        let cart = self
            .carts_repository
            .create_cart(&mut tx, CartUuid::new())
            .await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                UserInsert {
                    uuid: user.uuid,
                    first_name: user.first_name.trim(),
                    last_name: user.last_name.trim(),
                    email: &email,
                    age: user.age,
                    password_hash: &password_hash,
                    cart_uuid: cart.uuid,
                    role: user.role,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %created.uuid, role = %created.role, "user registered");

        Ok(created)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let user = self
            .repository
            .get_user_by_email(&mut tx, &normalize_email(email))
            .await?;

        tx.commit().await?;

        let Some(user) = user else {
            return Err(UsersServiceError::InvalidCredentials);
        };

        if verify_password(password.to_string(), user.password_hash.clone()).await? {
            Ok(user)
        } else {
            Err(UsersServiceError::InvalidCredentials)
        }
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_users(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let users = self.repository.list_users(&mut tx, request).await?;
        let total = self.repository.count_users(&mut tx).await?;

        tx.commit().await?;

        Ok(Page::new(users, request, total))
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        update.validate()?;

        let email = update.email.as_deref().map(normalize_email);

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_user(
                &mut tx,
                user,
                UserChanges {
                    first_name: update.first_name.as_deref().map(str::trim),
                    last_name: update.last_name.as_deref().map(str::trim),
                    email: email.as_deref(),
                    age: update.age,
                    role: update.role,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %user, role = %updated.role, "user updated");

        Ok(updated)
    }

    async fn update_role(
        &self,
        user: UserUuid,
        role: Role,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_role(&mut tx, user, role).await?;

        tx.commit().await?;

        info!(user = %user, role = %role, "user role updated");

        Ok(updated)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let Some(cart) = self.repository.delete_user(&mut tx, user).await? else {
            return Err(UsersServiceError::NotFound);
        };

        if let Some(cart) = cart {
            self.carts_repository.delete_cart(&mut tx, cart).await?;
        }

        tx.commit().await?;

        info!(user = %user, "user deleted");

        Ok(())
    }

    async fn has_admin(&self) -> Result<bool, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let exists = self.repository.admin_exists(&mut tx).await?;

        tx.commit().await?;

        Ok(exists)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Create an account together with its empty cart.
    async fn register(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Check credentials. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    async fn list_users(&self, request: PageRequest)
    -> Result<Page<UserRecord>, UsersServiceError>;

    /// Change any subset of names, email, age and role.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    async fn update_role(&self, user: UserUuid, role: Role)
    -> Result<UserRecord, UsersServiceError>;

    /// Delete the account and its cart.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;

    /// Whether any admin account exists.
    async fn has_admin(&self) -> Result<bool, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::carts::CartsService,
        test::{
            TestContext,
            helpers::{PASSWORD, new_user, register_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn register_creates_user_with_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .register(NewUser {
                email: "  Ana@Example.com ".to_string(),
                ..new_user("ignored@example.com")
            })
            .await?;

        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, PASSWORD);

        let cart = user.cart_uuid.ok_or("user has no cart")?;

        assert!(ctx.carts.get_cart(cart).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;
        register_user(&ctx, "ana@example.com").await?;

        let result = ctx.users.register(new_user("ANA@example.com")).await;

        assert!(matches!(result, Err(UsersServiceError::AlreadyExists)));

        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .register(NewUser {
                password: "short".to_string(),
                ..new_user("ana@example.com")
            })
            .await;

        assert!(matches!(result, Err(UsersServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn authenticate_checks_email_and_password() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "ana@example.com").await?;

        let found = ctx.users.authenticate("ANA@example.com", PASSWORD).await?;
        assert_eq!(found.uuid, user.uuid);

        let wrong_password = ctx.users.authenticate("ana@example.com", "nope-nope").await;
        let unknown_email = ctx.users.authenticate("bob@example.com", PASSWORD).await;

        assert!(matches!(
            wrong_password,
            Err(UsersServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            unknown_email,
            Err(UsersServiceError::InvalidCredentials)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn list_users_paginates() -> TestResult {
        let ctx = TestContext::new().await;

        for n in 0..3 {
            register_user(&ctx, &format!("user{n}@example.com")).await?;
        }

        let page = ctx.users.list_users(PageRequest::new(Some(2), Some(2))).await?;

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_more());

        Ok(())
    }

    #[tokio::test]
    async fn update_role_and_has_admin() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "ana@example.com").await?;

        assert!(!ctx.users.has_admin().await?);

        let updated = ctx.users.update_role(user.uuid, Role::Admin).await?;

        assert_eq!(updated.role, Role::Admin);
        assert!(ctx.users.has_admin().await?);

        Ok(())
    }

    #[tokio::test]
    async fn update_role_returns_not_found_for_unknown_user() {
        let ctx = TestContext::new().await;

        let result = ctx.users.update_role(UserUuid::new(), Role::Premium).await;

        assert!(matches!(result, Err(UsersServiceError::NotFound)));
    }

    #[tokio::test]
    async fn update_user_changes_only_given_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "ana@example.com").await?;

        let updated = ctx
            .users
            .update_user(
                user.uuid,
                UserUpdate {
                    email: Some(" Ana.Maria@Example.com".to_string()),
                    age: Some(41),
                    role: Some(Role::Premium),
                    ..UserUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.email, "ana.maria@example.com");
        assert_eq!(updated.age, Some(41));
        assert_eq!(updated.role, Role::Premium);
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.last_name, user.last_name);
        assert_eq!(updated.password_hash, user.password_hash);

        Ok(())
    }

    #[tokio::test]
    async fn update_user_rejects_taken_email() -> TestResult {
        let ctx = TestContext::new().await;
        let ana = register_user(&ctx, "ana@example.com").await?;
        register_user(&ctx, "bob@example.com").await?;

        let result = ctx
            .users
            .update_user(
                ana.uuid,
                UserUpdate {
                    email: Some("BOB@example.com".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UsersServiceError::AlreadyExists)));

        Ok(())
    }

    #[tokio::test]
    async fn update_user_validates_before_lookup() {
        let ctx = TestContext::new().await;

        let empty = ctx
            .users
            .update_user(UserUuid::new(), UserUpdate::default())
            .await;
        let unknown = ctx
            .users
            .update_user(
                UserUuid::new(),
                UserUpdate {
                    age: Some(20),
                    ..UserUpdate::default()
                },
            )
            .await;

        assert!(matches!(empty, Err(UsersServiceError::Validation(_))));
        assert!(matches!(unknown, Err(UsersServiceError::NotFound)));
    }

    #[tokio::test]
    async fn delete_user_removes_user_and_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = register_user(&ctx, "ana@example.com").await?;
        let cart = user.cart_uuid.ok_or("user has no cart")?;

        ctx.users.delete_user(user.uuid).await?;

        assert!(matches!(
            ctx.users.get_user(user.uuid).await,
            Err(UsersServiceError::NotFound)
        ));
        assert!(ctx.carts.get_cart(cart).await.is_err());

        let again = ctx.users.delete_user(user.uuid).await;
        assert!(matches!(again, Err(UsersServiceError::NotFound)));

        Ok(())
    }
}
