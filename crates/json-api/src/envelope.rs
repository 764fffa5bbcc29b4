//! Response envelope.
//!
//! Every body carries `status`. Successes add `data` and an optional
//! `message`; failures add `message` and optional `details`.

use salvo::{
    async_trait,
    http::ResBody,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use mercado_app::validation::Violations;

use crate::tickets::responses::UnavailableProductResponse;

/// Result type returned by every JSON endpoint.
pub(crate) type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResponseStatus {
    Success,
    Error,
}

/// Successful response body.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct Envelope<T: ToSchema + 'static> {
    pub status: ResponseStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: ToSchema + 'static> Envelope<T> {
    pub(crate) fn ok(data: T) -> Json<Self> {
        Json(Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        })
    }

    pub(crate) fn with_message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: Some(data),
        })
    }
}

/// Identifier of a removed resource.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletedResponse {
    pub id: Uuid,
}

/// A rejected field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub(crate) struct ViolationResponse {
    pub field: String,
    pub message: String,
}

/// Structured context attached to an error.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorDetails {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationResponse>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable_products: Vec<UnavailableProductResponse>,
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ErrorBody {
    pub status: ResponseStatus,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            details: None,
        }
    }
}

/// An HTTP failure rendered as an error envelope.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<ErrorDetails>,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Generic 500. The cause is logged by the caller, never sent.
    pub(crate) fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error interno del servidor",
        )
    }

    /// 400 listing every rejected field.
    pub(crate) fn validation(violations: &Violations) -> Self {
        let mut error = Self::bad_request("Datos inválidos");

        error.details_mut().violations = violations
            .iter()
            .map(|violation| ViolationResponse {
                field: violation.field.clone(),
                message: violation.message.clone(),
            })
            .collect();

        error
    }

    #[must_use]
    pub(crate) fn with_unavailable(mut self, products: Vec<UnavailableProductResponse>) -> Self {
        self.details_mut().unavailable_products = products;
        self
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    fn details_mut(&mut self) -> &mut ErrorDetails {
        self.details.get_or_insert_with(ErrorDetails::default)
    }

    /// Write the envelope directly, for middleware that cannot return a
    /// `Result`.
    pub(crate) fn render_into(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorBody {
            status: ResponseStatus::Error,
            message: self.message,
            details: self.details,
        }));
    }
}

#[async_trait]
impl Writer for ApiError {
    async fn write(self, _req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        self.render_into(res);
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::UNAUTHORIZED, "Unauthorized"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "Not Found"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description).add_content(
                    "application/json",
                    oapi::Content::new(ErrorBody::to_schema(components)),
                ),
            );
        }
    }
}

/// Catcher hoop wrapping framework-generated errors (unmatched routes,
/// rejected bodies) in the error envelope.
#[handler]
pub(crate) async fn catch_status(res: &mut Response, ctrl: &mut FlowCtrl) {
    let Some(status) = res.status_code else {
        return;
    };

    if !(status.is_client_error() || status.is_server_error())
        || !matches!(res.body, ResBody::None | ResBody::Error(_))
    {
        return;
    }

    let message = status.canonical_reason().unwrap_or("Error");

    res.render(Json(ErrorBody::new(message)));
    ctrl.skip_rest();
}

#[cfg(test)]
mod tests {
    use salvo::{
        catcher::Catcher,
        test::{ResponseExt, TestClient},
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn fail_validation() -> Result<Json<Envelope<String>>, ApiError> {
        let mut violations = Violations::new();

        violations.push("title", "title es obligatorio");
        violations.push("price", "el precio debe ser mayor a 0");

        Err(ApiError::validation(&violations))
    }

    #[handler]
    async fn succeed() -> ApiResult<String> {
        Ok(Envelope::with_message("listo", "hola".to_string()))
    }

    fn service() -> Service {
        Service::new(
            Router::new()
                .push(Router::with_path("fail").get(fail_validation))
                .push(Router::with_path("ok").get(succeed)),
        )
        .catcher(Catcher::default().hoop(catch_status))
    }

    #[tokio::test]
    async fn success_envelope_carries_message_and_data() -> TestResult {
        let mut res = TestClient::get("http://example.com/ok")
            .send(&service())
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body,
            json!({ "status": "success", "message": "listo", "data": "hola" })
        );

        Ok(())
    }

    #[tokio::test]
    async fn validation_error_lists_every_violation() -> TestResult {
        let mut res = TestClient::get("http://example.com/fail")
            .send(&service())
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["status"], "error");
        assert_eq!(body["details"]["violations"][0]["field"], "title");
        assert_eq!(body["details"]["violations"][1]["field"], "price");
        assert!(body["details"].get("unavailableProducts").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn unmatched_route_is_wrapped_in_error_envelope() -> TestResult {
        let mut res = TestClient::get("http://example.com/missing")
            .send(&service())
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Not Found");

        Ok(())
    }
}
