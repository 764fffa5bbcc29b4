//! Update User Role Handler

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

use mercado_app::domain::users::records::Role;

use crate::{
    envelope::{ApiError, ApiResult, Envelope},
    extensions::*,
    state::State,
    users::{errors::into_api_error, responses::UserResponse, targets_self},
};

/// Update Role Request
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateRoleRequest {
    /// `user`, `premium` or `admin`
    pub role: String,
}

/// Update User Role Handler
#[endpoint(
    tags("users"),
    summary = "Change User Role",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Role updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown role or own demotion"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
#[tracing::instrument(
    name = "users.update_role",
    skip(user, json, depot),
    fields(user_uuid = %*user, role = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateRoleRequest>,
    depot: &mut Depot,
) -> ApiResult<UserResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let role = json
        .into_inner()
        .role
        .parse::<Role>()
        .map_err(|error| ApiError::bad_request(format!("Rol inválido: {}", error.0)))?;

    tracing::Span::current().record("role", role.as_str());

    let user = user.into_inner();

    if !role.is_admin() && targets_self(depot, user)? {
        return Err(ApiError::bad_request(
            "No puedes cambiar tu propio rol de administrador",
        ));
    }

    let user = state
        .app
        .users
        .update_role(user.into(), role)
        .await
        .map_err(into_api_error)?;

    tracing::info!(user_uuid = %user.uuid, role = role.as_str(), "updated user role");

    Ok(Envelope::with_message("Rol actualizado", user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::domain::users::{MockUsersService, records::UserUuid};

    use crate::test_helpers::{MockServices, TEST_USER_UUID, admin_service, make_user};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        admin_service(
            MockServices {
                users,
                ..MockServices::default()
            },
            Router::with_path("users/{user}/role").put(handler),
        )
    }

    #[tokio::test]
    async fn test_promotes_user_to_premium() -> TestResult {
        let uuid = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_update_role()
            .once()
            .withf(move |u, role| *u == uuid && *role == Role::Premium)
            .return_once(move |_, role| Ok(make_user(uuid, "ana@example.com", role)));

        let mut res = TestClient::put(format!("http://example.com/users/{uuid}/role"))
            .json(&json!({ "role": "premium" }))
            .send(&make_service(users))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["role"], "premium");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_role_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_update_role().never();

        let res = TestClient::put(format!("http://example.com/users/{}/role", UserUuid::new()))
            .json(&json!({ "role": "superuser" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_cannot_demote_self() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_update_role().never();

        let mut res = TestClient::put(format!(
            "http://example.com/users/{TEST_USER_UUID}/role"
        ))
        .json(&json!({ "role": "user" }))
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
    async fn test_admin_may_reassert_own_admin_role() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_update_role()
            .once()
            .withf(|u, role| *u == TEST_USER_UUID && *role == Role::Admin)
            .return_once(|uuid, role| Ok(make_user(uuid, "admin@example.com", role)));

        let res = TestClient::put(format!(
            "http://example.com/users/{TEST_USER_UUID}/role"
        ))
        .json(&json!({ "role": "admin" }))
        .send(&make_service(users))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
