//! Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::Deserialize;
use uuid::Uuid;

use mercado_app::domain::users::{data::UserUpdate, records::Role};

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extensions::*,
    state::State,
    users::{errors::into_api_error, responses::UserResponse, targets_self},
};

/// Update User Request
///
/// Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// 0 to 150
    pub age: Option<u32>,
    /// `user`, `premium` or `admin`
    pub role: Option<String>,
}

impl TryFrom<UpdateUserRequest> for UserUpdate {
    type Error = ApiError;

    fn try_from(request: UpdateUserRequest) -> Result<Self, Self::Error> {
        let role = request
            .role
            .map(|role| role.parse::<Role>())
            .transpose()
            .map_err(|error| ApiError::bad_request(format!("Rol inválido: {}", error.0)))?;

        Ok(UserUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            age: request.age,
            role,
        })
    }
}

/// Update User Handler
///
/// Edits names, email, age and role of any account. Admins cannot drop
/// their own admin role.
#[endpoint(
    tags("users"),
    summary = "Update User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid update or own demotion"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
    ),
)]
#[tracing::instrument(
    name = "users.update",
    skip(user, json, depot),
    fields(user_uuid = %*user),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> ApiResult<UserResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update = UserUpdate::try_from(json.into_inner())?;
    let user = user.into_inner();

    if update.role.is_some_and(|role| !role.is_admin()) && targets_self(depot, user)? {
        return Err(ApiError::bad_request(
            "No puedes cambiar tu propio rol de administrador",
        ));
    }

    let user = state
        .app
        .users
        .update_user(user.into(), update)
        .await
        .map_err(into_api_error)?;

    tracing::info!(user_uuid = %user.uuid, "updated user");

    Ok(Envelope::with_message("Usuario actualizado", user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::domain::users::{MockUsersService, UsersServiceError, records::UserUuid};

    use crate::test_helpers::{MockServices, TEST_USER_UUID, admin_service, make_user};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        admin_service(
            MockServices {
                users,
                ..MockServices::default()
            },
            Router::with_path("users/{user}").put(handler),
        )
    }

    fn rejecting_service() -> MockUsersService {
        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .returning(|_, update| match update.validate() {
                Ok(()) => Err(UsersServiceError::NotFound),
                Err(violations) => Err(violations.into()),
            });

        users
    }

    #[tokio::test]
    async fn test_updates_given_fields() -> TestResult {
        let uuid = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .withf(move |u, update| {
                *u == uuid
                    && update.first_name.as_deref() == Some("Lucía")
                    && update.age == Some(28)
                    && update.role == Some(Role::Premium)
                    && update.email.is_none()
            })
            .return_once(move |_, update| {
                let mut user = make_user(uuid, "lucia@example.com", Role::Premium);
                user.first_name = "Lucía".to_string();
                user.age = update.age;
                Ok(user)
            });

        let mut res = TestClient::put(format!("http://example.com/users/{uuid}"))
            .json(&json!({ "firstName": "Lucía", "age": 28, "role": "premium" }))
            .send(&make_service(users))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["message"], "Usuario actualizado");
        assert_eq!(body["data"]["firstName"], "Lucía");
        assert_eq!(body["data"]["age"], 28);
        assert_eq!(body["data"]["role"], "premium");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_update_returns_400() -> TestResult {
        let mut res = TestClient::put(format!("http://example.com/users/{}", UserUuid::new()))
            .json(&json!({}))
            .send(&make_service(rejecting_service()))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["details"]["violations"][0]["field"], "user");

        Ok(())
    }

    #[tokio::test]
    async fn test_age_out_of_range_returns_400() -> TestResult {
        let mut res = TestClient::put(format!("http://example.com/users/{}", UserUuid::new()))
            .json(&json!({ "age": 151 }))
            .send(&make_service(rejecting_service()))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["details"]["violations"][0]["field"], "age");

        Ok(())
    }

    #[tokio::test]
    async fn test_negative_age_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_update_user().never();

        let res = TestClient::put(format!("http://example.com/users/{}", UserUuid::new()))
            .json(&json!({ "age": -1 }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_role_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_update_user().never();

        let res = TestClient::put(format!("http://example.com/users/{}", UserUuid::new()))
            .json(&json!({ "role": "owner" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_update_user().never();

        let mut res = TestClient::put(format!("http://example.com/users/{TEST_USER_UUID}"))
            .json(&json!({ "lastName": "Pérez", "role": "premium" }))
            .send(&make_service(users))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body["message"],
            "No puedes cambiar tu propio rol de administrador"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_taken_email_returns_409() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::put(format!("http://example.com/users/{}", UserUuid::new()))
            .json(&json!({ "email": "bob@example.com" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
