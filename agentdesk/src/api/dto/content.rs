use serde::{Deserialize, Serialize};
use validator::Validate;

use super::download_url;
use crate::models::{ContentKind, ContentLength};
use crate::services::ContentOutcome;

/// Request body for `POST /content`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct ContentRequest {
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub topic: String,
    /// `article`, `report`, `summary`, `essay` or any other kind of text.
    #[serde(rename = "type", default)]
    #[schema(value_type = String, example = "article")]
    pub content_type: ContentKind,
    /// `short`, `medium` or `long`; anything else is treated as medium.
    #[serde(default)]
    pub length: Option<String>,
}

impl ContentRequest {
    pub fn length(&self) -> ContentLength {
        self.length
            .as_deref()
            .map(ContentLength::parse_lenient)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ContentResponse {
    pub message: String,
    pub filename: String,
    pub download_url: String,
    pub topic: String,
    pub content_type: String,
    pub length: String,
    pub word_count_estimate: usize,
    pub preview: String,
    pub text: String,
}

impl From<ContentOutcome> for ContentResponse {
    fn from(outcome: ContentOutcome) -> Self {
        Self {
            message: format!("Created {} about {}", outcome.kind, outcome.topic),
            download_url: download_url(&outcome.filename),
            filename: outcome.filename,
            topic: outcome.topic,
            content_type: outcome.kind.to_string(),
            length: outcome.length.to_string(),
            word_count_estimate: outcome.word_count_estimate,
            preview: outcome.preview,
            text: outcome.text,
        }
    }
}
