//! User response bodies

use salvo::oapi::ToSchema;
use serde::Serialize;
use uuid::Uuid;

use mercado_app::domain::users::records::UserRecord;

/// User Response
///
/// Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// `user`, `premium` or `admin`
    pub role: String,

    /// The user's cart, if it still exists
    pub cart: Option<Uuid>,

    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.uuid.into_uuid(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            age: user.age,
            role: user.role.as_str().to_string(),
            cart: user.cart_uuid.map(|cart| cart.into_uuid()),
            created_at: user.created_at.to_string(),
        }
    }
}
