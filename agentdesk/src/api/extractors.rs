use std::sync::LazyLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use regex::Regex;

use crate::error::DeskError;

static MISSING_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"missing field `([^`]+)`").expect("Failed to compile missing field regex")
});

/// `axum::Json` whose rejections render through the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DeskError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for DeskError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        let message = match rejection {
            JsonRejection::JsonDataError(_) => match missing_field(&detail) {
                Some(field) => format!("Missing required field: {field}"),
                None => format!("Invalid request body: {detail}"),
            },
            JsonRejection::JsonSyntaxError(_) => format!("Malformed JSON: {detail}"),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected `Content-Type: application/json`".to_string()
            }
            _ => detail,
        };
        DeskError::Validation(message)
    }
}

fn missing_field(detail: &str) -> Option<&str> {
    MISSING_FIELD
        .captures(detail)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
