use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

/// Per-field validation messages, e.g. `{"email": ["Invalid credentials"]}`.
/// BTreeMap keeps serialization order stable so identical failures produce
/// byte-identical bodies.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub fn field_errors(field: &str, messages: &[&str]) -> FieldErrors {
    let mut map = FieldErrors::new();
    map.insert(
        field.to_string(),
        messages.iter().map(|m| (*m).to_string()).collect(),
    );
    map
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unprocessable entity")]
    Validation(FieldErrors),
    #[error("duplicate resource")]
    Duplicate(FieldErrors),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) | ApiError::Duplicate(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
                Some(errors),
            ),
            // Same body for "no such account" and "wrong password".
            ApiError::InvalidCredentials => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Unprocessable Entity",
                Some(field_errors("email", &["Invalid credentials"])),
            ),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            // Same body whether the row is absent or owned by someone else.
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Resource not found", None),
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    None,
                )
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Conflict => {
                ApiError::Internal(anyhow::anyhow!("unexpected unique constraint violation"))
            }
            StoreError::Backend(e) => ApiError::Internal(e),
        }
    }
}
