use crate::handlers::errors::{into_response, HandlerError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, MicropostResponse, PaginationQuery};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use identity::{microposts, NewMicropost};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// Request body for posting a micropost
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateMicropostRequest {
    /// Non-blank, at most 140 characters
    pub content: String,
}

/// Post a micropost as the given user
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/microposts",
    tag = "microposts",
    params(
        ("user_id" = i32, Path, description = "Author ID"),
    ),
    request_body = CreateMicropostRequest,
    responses(
        (status = 201, description = "Micropost created", body = ApiResponse<MicropostResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_micropost(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<CreateMicropostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MicropostResponse>>), HandlerError> {
    trace!("Entering create_micropost function for user_id: {}", user_id);

    let post = NewMicropost {
        content: request.content,
    };
    let created = microposts::create_micropost(&state.db, user_id, post)
        .await
        .map_err(into_response)?;

    info!("Micropost {} created", created.id);
    let response = ApiResponse {
        data: MicropostResponse::from(created),
        message: "Micropost created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// A user's microposts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/microposts",
    tag = "microposts",
    params(
        ("user_id" = i32, Path, description = "Author ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "Microposts retrieved", body = ApiResponse<Vec<MicropostResponse>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user_microposts(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PaginationQuery>>,
) -> Result<Json<ApiResponse<Vec<MicropostResponse>>>, HandlerError> {
    trace!("Entering get_user_microposts function for user_id: {}", user_id);

    let posts = microposts::feed(&state.db, user_id, query.page(), query.limit())
        .await
        .map_err(into_response)?;

    debug!("Retrieved {} microposts for user {}", posts.len(), user_id);
    let response = ApiResponse {
        data: posts.into_iter().map(MicropostResponse::from).collect(),
        message: "Microposts retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a micropost
#[utoipa::path(
    delete,
    path = "/api/v1/microposts/{micropost_id}",
    tag = "microposts",
    params(
        ("micropost_id" = i32, Path, description = "Micropost ID"),
    ),
    responses(
        (status = 200, description = "Micropost deleted", body = ApiResponse<String>),
        (status = 404, description = "Micropost not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_micropost(
    Path(micropost_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_micropost function for micropost_id: {}", micropost_id);

    microposts::delete_micropost(&state.db, micropost_id)
        .await
        .map_err(into_response)?;

    let response = ApiResponse {
        data: format!("Micropost {} deleted", micropost_id),
        message: "Micropost deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
