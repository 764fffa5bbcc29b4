//! Users

use salvo::Depot;
use uuid::Uuid;

use mercado_app::domain::users::records::UserUuid;

use crate::{envelope::ApiError, extensions::*};

pub(crate) mod errors;
mod handlers;
pub(crate) mod responses;

pub(crate) use handlers::*;

/// Whether the signed-in admin is the target of the request.
pub(crate) fn targets_self(depot: &Depot, user: Uuid) -> Result<bool, ApiError> {
    Ok(depot.identity_or_401()?.user_uuid == UserUuid::from(user))
}
