use crate::schemas::{ErrorResponse, FieldErrorDetail};
use axum::{http::StatusCode, response::Json};
use identity::{validation::field_messages, IdentityError};
use tracing::{error, warn};

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Translate an identity failure into the status code and body the API returns.
pub fn into_response(err: IdentityError) -> HandlerError {
    match err {
        IdentityError::Validation(errors) => {
            let details: Vec<FieldErrorDetail> = field_messages(&errors)
                .into_iter()
                .map(FieldErrorDetail::from)
                .collect();
            warn!("Request rejected with {} field errors", details.len());
            let mut body = ErrorResponse::new("Validation failed", "VALIDATION_ERROR");
            body.details = Some(details);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body))
        }
        IdentityError::Conflict(message) => {
            warn!("Conflicting write: {}", message);
            (StatusCode::CONFLICT, Json(ErrorResponse::new(message, "CONFLICT")))
        }
        IdentityError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("{} not found", what), "NOT_FOUND")),
        ),
        IdentityError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid token", "INVALID_TOKEN")),
        ),
        IdentityError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Token expired", "TOKEN_EXPIRED")),
        ),
        IdentityError::Hashing(detail) => {
            error!("Hashing failure: {}", detail);
            internal_error()
        }
        IdentityError::Database(db_error) => {
            error!("Database failure: {}", db_error);
            internal_error()
        }
    }
}

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR")),
    )
}
