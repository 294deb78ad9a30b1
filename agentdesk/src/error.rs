use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded: {0}")]
    LlmRateLimit(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl DeskError {
    /// True for every failure that originates at the upstream LLM provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            DeskError::Llm(_) | DeskError::LlmUnavailable(_) | DeskError::LlmRateLimit(_)
        )
    }
}

impl From<zip::result::ZipError> for DeskError {
    fn from(error: zip::result::ZipError) -> Self {
        DeskError::Render(format!("Failed to write presentation package: {error}"))
    }
}

impl From<validator::ValidationErrors> for DeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();
        DeskError::Validation(fields.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_variants_are_grouped() {
        assert!(DeskError::Llm("boom".into()).is_upstream());
        assert!(DeskError::LlmUnavailable("no key".into()).is_upstream());
        assert!(DeskError::LlmRateLimit("slow down".into()).is_upstream());
        assert!(!DeskError::Computation("x".into()).is_upstream());
        assert!(!DeskError::NotFound("x".into()).is_upstream());
    }

    #[test]
    fn display_includes_kind_prefix() {
        let err = DeskError::Computation("zero variance".into());
        assert_eq!(err.to_string(), "Computation error: zero variance");
    }
}
