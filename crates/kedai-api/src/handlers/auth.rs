//! Registration and login handlers.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    Form, Json,
};
use tracing::{info, warn};

use kedai_core::{CreateUserRequest, NewUser, Token, UserRepository};

use crate::auth::{hash_password, is_valid_email, validate_registration, verify_password};
use crate::query_types::LoginForm;
use crate::{ApiError, AppState};

const DUPLICATE_EMAIL: &str = "The user with this email already exists in the system";
const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Exchange email and password for a bearer token.
///
/// The form follows the OAuth2 password flow: `username` holds the email.
///
/// # Returns
/// - 200 OK with `{ access_token, token_type: "bearer" }`
/// - 400 Bad Request if `username` is not an email address
/// - 401 Unauthorized on unknown email or wrong password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = Token),
        (status = 400, description = "Malformed email"),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<Token>, ApiError> {
    let Form(form) = form?;
    let email = form.username.trim();
    if !is_valid_email(email) {
        return Err(ApiError::BadRequest(
            "value is not a valid email address".to_string(),
        ));
    }

    let user = state.db.users.get_by_email(email).await?;
    let user = match user {
        Some(u) if verify_password(&form.password, &u.hashed_password) => u,
        _ => {
            warn!(subsystem = "api", op = "login", "Rejected login attempt");
            return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
    };

    let token = state.jwt.issue(&user.email)?;
    Ok(Json(Token::bearer(token)))
}

/// Create an account and return a bearer token for it.
///
/// # Returns
/// - 200 OK with `{ access_token, token_type: "bearer" }`
/// - 400 Bad Request on invalid fields or an email already registered
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Access token", body = Token),
        (status = 400, description = "Invalid fields or duplicate email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<Token>, ApiError> {
    let Json(req) = body?;
    validate_registration(&req)?;
    let email = req.email.trim().to_string();

    if state.db.users.get_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest(DUPLICATE_EMAIL.to_string()));
    }

    // Concurrent duplicates surface as Conflict from the unique index.
    let user = state
        .db
        .users
        .insert(NewUser {
            name: req.name.trim().to_string(),
            email,
            hashed_password: hash_password(&req.password)?,
        })
        .await?;
    info!(subsystem = "api", op = "register", user_id = user.id, "User registered");

    let token = state.jwt.issue(&user.email)?;
    Ok(Json(Token::bearer(token)))
}
