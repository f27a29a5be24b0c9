use chrono::{DateTime, Utc};
use identity::FieldMessage;
use model::entities::{micropost, user};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// Pagination parameters for list endpoints
#[derive(Debug, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
pub struct PaginationQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 30)
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(30)
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// A single failed field rule
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FieldErrorDetail {
    /// Field the rule applies to
    pub field: String,
    /// Machine readable rule code, e.g. `blank` or `taken`
    pub code: String,
    /// Human readable message
    pub message: String,
}

impl From<FieldMessage> for FieldErrorDetail {
    fn from(message: FieldMessage) -> Self {
        Self {
            field: message.field,
            code: message.code,
            message: message.message,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Field level failures, present for validation errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldErrorDetail>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
            details: None,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Public view of a user; digests never leave the server
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub activated: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            admin: model.admin,
            activated: model.activated,
            created_at: model.created_at,
        }
    }
}

/// Micropost response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MicropostResponse {
    pub id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<micropost::Model> for MicropostResponse {
    fn from(model: micropost::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::sessions::create_session,
        crate::handlers::sessions::delete_session,
        crate::handlers::microposts::create_micropost,
        crate::handlers::microposts::get_user_microposts,
        crate::handlers::microposts::delete_micropost,
    ),
    components(
        schemas(
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<MicropostResponse>,
            ApiResponse<Vec<MicropostResponse>>,
            ApiResponse<crate::handlers::sessions::SessionResponse>,
            ApiResponse<crate::handlers::users::DeletedUserResponse>,
            ApiResponse<String>,
            ErrorResponse,
            FieldErrorDetail,
            HealthResponse,
            PaginationQuery,
            UserResponse,
            MicropostResponse,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::DeletedUserResponse,
            crate::handlers::sessions::CreateSessionRequest,
            crate::handlers::sessions::SessionResponse,
            crate::handlers::microposts::CreateMicropostRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User registration and management"),
        (name = "sessions", description = "Password authentication and remember tokens"),
        (name = "microposts", description = "Microposts authored by users"),
    ),
    info(
        title = "Microblog API",
        description = "Users, authentication and microposts",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
