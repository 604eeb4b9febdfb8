//! Success envelope shared by every endpoint.
//!
//! ```json
//! { "message": "Room created successfully", "data": { ... } }
//! ```

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            message: "Success".to_string(),
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Payload returned by delete endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedResource {
    #[schema(value_type = String, format = "uuid")]
    pub id: String,
}

impl DeletedResource {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_uses_default_message() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body["message"], "Success");
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_with_message_wraps_payload() {
        let body = serde_json::to_value(ApiResponse::with_message(
            "Block deleted successfully",
            DeletedResource::new("abc"),
        ))
        .unwrap();
        assert_eq!(body["message"], "Block deleted successfully");
        assert_eq!(body["data"]["id"], "abc");
    }
}
