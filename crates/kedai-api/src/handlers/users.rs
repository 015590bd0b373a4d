//! Current-user handler.

use axum::Json;

use kedai_core::UserPublic;

use crate::auth::CurrentUser;

/// The user the bearer token was issued to.
///
/// # Returns
/// - 200 OK with the public user fields
/// - 401 Unauthorized when the token is missing, invalid or expired
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = UserPublic),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn read_user_me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user)
}
