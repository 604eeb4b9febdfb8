//! Application error type.
//!
//! Every handler and service returns [`AppError`]. The error carries the HTTP
//! status, a machine readable [`ErrorKind`], the underlying cause and, for
//! payload validation failures, per-field messages.
//!
//! The response body has the shape:
//!
//! ```json
//! { "error": "invalid_state", "message": "Room is at full capacity" }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidState,
    BadRequest,
    ValidationFailed,
    Unauthorized,
    Forbidden,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::BadRequest => "bad_request",
            Self::ValidationFailed => "validation_failed",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::Internal => "internal",
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            s if s.is_client_error() => Self::BadRequest,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub error: Error,
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            kind: ErrorKind::from_status(status),
            error: err.into(),
            fields: None,
        }
    }

    pub fn with_kind<E>(status: StatusCode, kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            kind,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    /// `Room not found with id: 4f7c…`
    pub fn not_found_entity(entity: &str, field: &str, value: impl fmt::Display) -> Self {
        Self::not_found(anyhow!("{} not found with {}: {}", entity, field, value))
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(
            StatusCode::BAD_REQUEST,
            ErrorKind::Conflict,
            anyhow!(message.into()),
        )
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::with_kind(
            StatusCode::BAD_REQUEST,
            ErrorKind::InvalidState,
            anyhow!(message.into()),
        )
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    pub fn validation(fields: BTreeMap<String, Vec<String>>) -> Self {
        let summary = fields
            .iter()
            .flat_map(|(_, messages)| messages.iter().cloned())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            status: StatusCode::BAD_REQUEST,
            kind: ErrorKind::ValidationFailed,
            error: anyhow!(if summary.is_empty() {
                "Validation failed".to_string()
            } else {
                summary
            }),
            fields: Some(fields),
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind, self.status, self.error)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(error = ?self.error, status = %self.status, "request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(ErrorResponse {
            error: self.kind,
            message,
            fields: self.fields,
        });

        (self.status, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return AppError::not_found(anyhow!("Resource not found"));
        }

        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique constraint");
                return AppError::conflict(format!("Duplicate value violates {}", constraint));
            }
            if db_err.is_check_violation() {
                let constraint = db_err.constraint().unwrap_or("check constraint");
                return AppError::invalid_state(format!("Write rejected by {}", constraint));
            }
            if db_err.is_foreign_key_violation() {
                return AppError::invalid_state("Referenced record does not exist or is in use");
            }
        }

        AppError::database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation(field_messages(&errors))
    }
}

/// Flattens validator output into `field -> [messages]`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1))]
        capacity: i32,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_kind_follows_status() {
        assert_eq!(AppError::not_found(anyhow!("x")).kind, ErrorKind::NotFound);
        assert_eq!(AppError::unauthorized("x").kind, ErrorKind::Unauthorized);
        assert_eq!(AppError::forbidden("x").kind, ErrorKind::Forbidden);
        assert_eq!(AppError::bad_request(anyhow!("x")).kind, ErrorKind::BadRequest);
        assert_eq!(AppError::internal_error("x").kind, ErrorKind::Internal);
    }

    #[test]
    fn test_conflict_and_invalid_state_are_bad_requests() {
        let conflict = AppError::conflict("Block name already exists");
        assert_eq!(conflict.status, StatusCode::BAD_REQUEST);
        assert_eq!(conflict.kind, ErrorKind::Conflict);

        let invalid = AppError::invalid_state("Room is at full capacity");
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.kind, ErrorKind::InvalidState);
    }

    #[test]
    fn test_not_found_entity_message() {
        let err = AppError::not_found_entity("Student", "rollNumber", "R1");
        assert_eq!(err.message(), "Student not found with rollNumber: R1");
    }

    #[test]
    fn test_validation_errors_collect_fields() {
        let payload = Payload {
            name: String::new(),
            capacity: 0,
        };
        let err: AppError = payload.validate().unwrap_err().into();

        assert_eq!(err.kind, ErrorKind::ValidationFailed);
        let fields = err.fields.unwrap();
        assert_eq!(fields["name"], vec!["Name is required".to_string()]);
        assert_eq!(fields["capacity"], vec!["capacity is invalid".to_string()]);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = AppError::invalid_state("Room is already empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_state");
        assert_eq!(body["message"], "Room is already empty");
        assert!(body.get("fields").is_none());
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = AppError::internal_error("connection refused").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal");
        assert_eq!(body["message"], "Internal server error");
    }
}
