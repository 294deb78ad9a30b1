use chrono::Local;
use tracing::{debug, info};

use crate::artifacts::{safe_stem, ArtifactStore};
use crate::error::{DeskError, Result};
use crate::llm::{prompts, CompletionOptions, LlmProvider};
use crate::models::{ContentKind, ContentLength};
use crate::render::render_text_document;

const PREVIEW_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct ContentOutcome {
    pub filename: String,
    pub topic: String,
    pub kind: ContentKind,
    pub length: ContentLength,
    pub text: String,
    pub word_count_estimate: usize,
    pub preview: String,
}

#[derive(Clone)]
pub struct ContentService {
    llm: LlmProvider,
    artifacts: ArtifactStore,
}

impl ContentService {
    pub fn new(llm: LlmProvider, artifacts: ArtifactStore) -> Self {
        Self { llm, artifacts }
    }

    pub async fn generate(
        &self,
        topic: &str,
        kind: ContentKind,
        length: ContentLength,
    ) -> Result<ContentOutcome> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DeskError::Validation("topic must not be empty".to_string()));
        }

        info!(
            topic,
            kind = kind.as_str(),
            length = length.as_str(),
            "Generating content"
        );

        let sizing = length.spec();
        let prompt = prompts::content_prompt(topic, &kind, &sizing);
        let options = CompletionOptions::with_max_tokens(sizing.max_tokens);
        let text = self.llm.complete(&prompt, Some(&options)).await?;
        if text.is_empty() {
            return Err(DeskError::Llm("LLM returned empty content".to_string()));
        }
        debug!(chars = text.len(), "Content received");

        let document = render_text_document(&kind, topic, length, Local::now(), &text);
        let prefix = match safe_stem(kind.as_str()) {
            stem if stem.is_empty() => "content".to_string(),
            stem => stem.to_lowercase(),
        };
        let filename = ArtifactStore::unique_name(&prefix, topic, "content", "txt");
        self.artifacts.write(&filename, document.as_bytes()).await?;

        let word_count_estimate = text.split_whitespace().count();
        info!(
            filename = filename.as_str(),
            words = word_count_estimate,
            "Content created"
        );

        Ok(ContentOutcome {
            filename,
            topic: topic.to_string(),
            kind,
            length,
            preview: preview(&text),
            word_count_estimate,
            text,
        })
    }
}

/// First five lines of `text`, with `...` appended when anything was cut.
pub fn preview(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= PREVIEW_LINES {
        return text.to_string();
    }
    format!("{}...", lines[..PREVIEW_LINES].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_preview_is_unchanged() {
        assert_eq!(preview("one\ntwo"), "one\ntwo");
    }

    #[test]
    fn long_text_preview_is_truncated() {
        let text = (1..=8)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n");
        let preview = preview(&text);
        assert!(preview.starts_with("line 1\n"));
        assert!(preview.ends_with("line 5..."));
        assert!(!preview.contains("line 6"));
    }
}
