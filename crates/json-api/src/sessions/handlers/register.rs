//! Register Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::Deserialize;

use mercado_app::domain::users::{
    data::NewUser,
    records::{Role, UserUuid},
};

use crate::{
    envelope::{ApiResult, Envelope},
    extensions::*,
    sessions::responses::SessionResponse,
    state::State,
    users::errors::{into_api_error, session_error},
};

/// Register Request
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<u32>,
    /// At least 8 characters
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            uuid: UserUuid::new(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            age: request.age,
            password: request.password,
            role: Role::User,
        }
    }
}

/// Register Handler
///
/// Creates an account with its own empty cart and signs it in.
#[endpoint(
    tags("sessions"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid registration data"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
    ),
)]
#[tracing::instrument(name = "sessions.register", skip_all, err)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> ApiResult<SessionResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let user = state
        .app
        .users
        .register(json.into_inner().into())
        .await
        .map_err(into_api_error)?;

    let session = state
        .app
        .auth
        .issue_session(user.uuid)
        .await
        .map_err(session_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Envelope::with_message(
        "Usuario registrado",
        SessionResponse::new(session, user),
    ))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mercado_app::{
        auth::{IssuedSession, MockAuthService},
        domain::users::{MockUsersService, UsersServiceError},
    };

    use crate::test_helpers::{MockServices, make_user, public_service};

    use super::*;

    fn make_service(users: MockUsersService, auth: MockAuthService) -> Service {
        public_service(
            MockServices {
                users,
                auth,
                ..MockServices::default()
            },
            Router::with_path("sessions/register").post(handler),
        )
    }

    fn payload() -> Value {
        json!({
            "firstName": "Ana",
            "lastName": "Pérez",
            "email": "Ana@Example.com",
            "age": 30,
            "password": "correct-horse-battery",
        })
    }

    #[tokio::test]
    async fn test_register_creates_user_and_session() -> TestResult {
        let mut users = MockUsersService::new();
        let mut auth = MockAuthService::new();

        users
            .expect_register()
            .once()
            .withf(|new| {
                new.email == "Ana@Example.com"
                    && new.role == Role::User
                    && new.password == "correct-horse-battery"
            })
            .return_once(|new| Ok(make_user(new.uuid, "ana@example.com", Role::User)));

        auth.expect_issue_session().once().return_once(|_| {
            Ok(IssuedSession {
                token: "ms_v1_token".to_string(),
                expires_at: Timestamp::UNIX_EPOCH,
            })
        });

        let mut res = TestClient::post("http://example.com/sessions/register")
            .json(&payload())
            .send(&make_service(users, auth))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body["data"]["token"], "ms_v1_token");
        assert_eq!(body["data"]["user"]["role"], "user");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_returns_409() -> TestResult {
        let mut users = MockUsersService::new();
        let mut auth = MockAuthService::new();

        users
            .expect_register()
            .once()
            .return_once(|_| Err(UsersServiceError::AlreadyExists));
        auth.expect_issue_session().never();

        let res = TestClient::post("http://example.com/sessions/register")
            .json(&payload())
            .send(&make_service(users, auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
