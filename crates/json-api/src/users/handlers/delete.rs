//! Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    envelope::{ApiError, ApiResult, DeletedResponse, Envelope},
    extensions::*,
    state::State,
    users::{errors::into_api_error, targets_self},
};

/// Delete User Handler
///
/// Deletes the account together with its cart. Admins cannot delete
/// themselves.
#[endpoint(
    tags("users"),
    summary = "Delete User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Own account"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
    ),
)]
#[tracing::instrument(name = "users.delete", skip(user, depot), fields(user_uuid = %*user), err)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> ApiResult<DeletedResponse> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = user.into_inner();

    if targets_self(depot, user)? {
        return Err(ApiError::bad_request(
            "No puedes eliminar tu propia cuenta de administrador",
        ));
    }

    state
        .app
        .users
        .delete_user(user.into())
        .await
        .map_err(into_api_error)?;

    tracing::info!(user_uuid = %user, "deleted user");

    Ok(Envelope::with_message(
        "Usuario eliminado",
        DeletedResponse { id: user },
    ))
}
