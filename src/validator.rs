use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use dormex_core::AppError;

/// JSON body extractor that runs `validator` rules after deserializing.
///
/// Both malformed bodies and rule violations are reported as
/// `validation_failed`, with per-field messages where a field can be named.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn single_field(field: &str, message: String) -> AppError {
    AppError::validation(BTreeMap::from([(field.to_string(), vec![message])]))
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return single_field(
            "body",
            "Missing 'Content-Type: application/json' header".to_string(),
        );
    }

    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return single_field(field, format!("{} is required", field));
    }

    if error_msg.contains("unknown variant") || error_msg.contains("invalid type") {
        // "...target type: status: unknown variant `X`, expected ..."
        let detail = error_msg
            .split_once("target type: ")
            .map(|(_, detail)| detail)
            .unwrap_or(&error_msg);
        let field = detail
            .split_once(": ")
            .map(|(path, _)| path)
            .filter(|path| !path.is_empty() && !path.contains(' '))
            .unwrap_or("body");
        return single_field(field, "Invalid value".to_string());
    }

    single_field("body", "Invalid request body".to_string())
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
