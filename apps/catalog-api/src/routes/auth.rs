use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use catalog_core::{LoginRequest, LoginResponse, UserSummary};

use crate::auth::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `POST /auth/login`
///
/// Unknown user and wrong password give the same 401.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = body?;
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let Some(user) = state.db.users().find_by_username(req.username.trim()).await? else {
        warn!(username = %req.username, "Login for unknown user");
        return Err(invalid());
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(username = %user.username, "Login with wrong password");
        return Err(invalid());
    }

    let access_token = state.jwt.generate_access_token(&user.id, &user.username)?;
    info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        user: UserSummary::from(user),
    }))
}
