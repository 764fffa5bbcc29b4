//! Auth middleware.

use std::sync::Arc;

use mercado_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{error, warn};

use crate::{envelope::ApiError, extensions::*, state::State};

/// Resolve the bearer token to an [`Identity`](mercado_app::auth::Identity)
/// and store it in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        reject(
            ApiError::unauthorized("Token de autenticación requerido"),
            res,
            ctrl,
        );

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            reject(error, res, ctrl);

            return;
        }
    };

    let identity = match state.app.auth.authenticate_bearer(token).await {
        Ok(identity) => identity,
        Err(AuthServiceError::NotFound) => {
            reject(
                ApiError::unauthorized("Token inválido o expirado"),
                res,
                ctrl,
            );

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate session token: {source}");

            reject(ApiError::internal(), res, ctrl);

            return;
        }
        Err(AuthServiceError::Token(source)) => {
            error!("failed to process session token: {source}");

            reject(ApiError::internal(), res, ctrl);

            return;
        }
        Err(AuthServiceError::OpenBao(source)) => {
            error!("OpenBao error during session authentication: {source}");

            reject(ApiError::internal(), res, ctrl);

            return;
        }
    };

    depot.insert_identity(identity);

    ctrl.call_next(req, depot, res).await;
}

/// Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(error) = depot.admin_or_403() {
        if let Ok(identity) = depot.identity_or_401() {
            warn!(user_uuid = %identity.user_uuid, "admin route refused");
        }

        reject(error, res, ctrl);

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn reject(error: ApiError, res: &mut Response, ctrl: &mut FlowCtrl) {
    error.render_into(res);
    ctrl.skip_rest();
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
