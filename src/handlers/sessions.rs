use crate::handlers::errors::{into_response, HandlerError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, UserResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use identity::users;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Login credentials
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
    /// Issue a remember token alongside the session
    pub remember_me: Option<bool>,
}

/// Authenticated user and, when requested, the raw remember token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_token: Option<String>,
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Invalid email/password combination", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, HandlerError> {
    trace!("Entering create_session function");

    let authenticated =
        users::authenticate_credentials(&state.db, &request.email, &request.password)
            .await
            .map_err(into_response)?;

    let Some(user) = authenticated else {
        warn!("Rejected login attempt");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(
                "Invalid email/password combination",
                "INVALID_CREDENTIALS",
            )),
        ));
    };

    let (user, remember_token) = if request.remember_me.unwrap_or(false) {
        let (user, token) = users::remember(&state.db, user)
            .await
            .map_err(into_response)?;
        debug!("Remember token issued for user {}", user.id);
        (user, Some(token))
    } else {
        (user, None)
    };

    info!("User {} logged in", user.id);
    let response = ApiResponse {
        data: SessionResponse {
            user: UserResponse::from(user),
            remember_token,
        },
        message: "Logged in successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Log out: invalidate the user's remember token
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{user_id}",
    tag = "sessions",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Remember token cleared", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_session(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_session function for user_id: {}", user_id);

    let user = users::reload_user(&state.db, user_id)
        .await
        .map_err(into_response)?;
    users::forget(&state.db, user).await.map_err(into_response)?;

    info!("User {} logged out", user_id);
    let response = ApiResponse {
        data: format!("User {} logged out", user_id),
        message: "Logged out successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
