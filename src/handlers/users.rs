use crate::handlers::errors::{into_response, HandlerError};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PaginationQuery, UserResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use identity::{users, NewUser, UserChanges};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// Request body for signing up a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name, at most 50 characters
    pub name: String,
    /// Email address; unique regardless of case
    pub email: String,
    /// Password, at least 6 characters
    pub password: String,
    /// Must equal `password` when supplied
    pub password_confirmation: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            password_confirmation: request.password_confirmation,
        }
    }
}

/// Request body for updating a user. Omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            password: request.password,
            password_confirmation: request.password_confirmation,
        }
    }
}

/// Response body for a deleted user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedUserResponse {
    pub user_id: i32,
    /// Number of microposts removed together with the user
    pub microposts_removed: u64,
}

/// Sign up a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), HandlerError> {
    trace!("Entering create_user function");
    debug!("Creating user with name: {}", request.name);

    let created = users::create_user(&state.db, request.into())
        .await
        .map_err(into_response)?;

    info!("User created successfully with ID: {}", created.user.id);
    let response = ApiResponse {
        data: UserResponse::from(created.user),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List users ordered by id
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<PaginationQuery>>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, HandlerError> {
    trace!("Entering get_users function");

    let users = users::list_users(&state.db, query.page(), query.limit())
        .await
        .map_err(into_response)?;

    debug!("Retrieved {} users from database", users.len());
    let response = ApiResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let user = users::reload_user(&state.db, user_id)
        .await
        .map_err(into_response)?;

    let response = ApiResponse {
        data: UserResponse::from(user),
        message: "User retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, HandlerError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let user = users::update_user(&state.db, user_id, request.into())
        .await
        .map_err(into_response)?;

    info!("User with ID {} updated", user.id);
    let response = ApiResponse {
        data: UserResponse::from(user),
        message: "User updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a user together with their microposts
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<DeletedUserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DeletedUserResponse>>, HandlerError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    let destroyed = users::destroy_user(&state.db, user_id)
        .await
        .map_err(into_response)?;

    info!(
        "User with ID {} deleted along with {} microposts",
        destroyed.user_id, destroyed.microposts_removed
    );
    let response = ApiResponse {
        data: DeletedUserResponse {
            user_id: destroyed.user_id,
            microposts_removed: destroyed.microposts_removed,
        },
        message: "User deleted successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
