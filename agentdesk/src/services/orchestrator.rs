//! Keyword routing of free-text chat messages to a single generator.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::error::Result;
use crate::llm::{prompts, LlmProvider};
use crate::models::{ContentKind, ContentLength, DataPoint};
use crate::services::content::{ContentOutcome, ContentService};
use crate::services::prediction::{self, PredictionOutcome};
use crate::services::presentation::{PresentationOutcome, PresentationService};

const DEFAULT_TOPIC: &str = "General Topic";

static PRESENTATION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:powerpoint|presentation|slides?|ppt|deck)")
        .expect("Failed to compile presentation keyword regex")
});

static CONTENT_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:write|article|content|essay|report|summary)")
        .expect("Failed to compile content keyword regex")
});

static PREDICTION_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:predict|regression|forecast)")
        .expect("Failed to compile prediction keyword regex")
});

static SLIDE_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)[\s-]*slides?\b").expect("Failed to compile slide count regex")
});

static TOPIC_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*?\b(?:about|on|regarding)\s+(.+)$").expect("Failed to compile topic regex")
});

static SLIDE_COUNT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\b(?:with|in|using)?\s*\d+[\s-]*slides?\b")
        .expect("Failed to compile slide phrase regex")
});

// Words stripped from a message when no `about`/`on`/`regarding` phrase names the topic.
const FILLER_GROUPS: [&str; 6] = [
    r"please|can|could|you|i|need|want|would|like|to|give|me|do",
    r"create|make|generate|build|prepare|write",
    r"a|an|the|some|for|about|on|regarding",
    r"short|brief|long|detailed|in-depth|medium",
    r"powerpoint|presentations?|slides?|ppt|decks?|articles?|content|essays?|reports?",
    r"summary|summaries|predict\w*|regression|forecast\w*",
];

static FILLER_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)\b(?:{})\b", FILLER_GROUPS.join("|"));
    Regex::new(&pattern).expect("Failed to compile filler word regex")
});

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)")
        .expect("Failed to compile data pair regex")
});

/// What a chat message asks for, with best-effort parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Presentation {
        topic: String,
        /// `None` means the configured default.
        slides: Option<i64>,
    },
    Content {
        topic: String,
        kind: ContentKind,
        length: ContentLength,
    },
    Prediction {
        data: Vec<DataPoint>,
        target: String,
    },
    Generic {
        prompt: String,
    },
}

impl Intent {
    pub fn action(&self) -> &'static str {
        match self {
            Intent::Presentation { .. } => "presentation",
            Intent::Content { .. } => "content",
            Intent::Prediction { .. } => "prediction",
            Intent::Generic { .. } => "generic",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChatOutcome {
    Presentation(PresentationOutcome),
    Content(ContentOutcome),
    Prediction(PredictionOutcome),
    Generic { response: String },
}

/// Classifies a message by keyword. Presentation wins over content, content over prediction.
pub fn classify(message: &str) -> Intent {
    let message = message.trim();

    if PRESENTATION_WORDS.is_match(message) {
        return Intent::Presentation {
            topic: extract_topic(message),
            slides: extract_slide_count(message),
        };
    }

    if CONTENT_WORDS.is_match(message) {
        return Intent::Content {
            topic: extract_topic(message),
            kind: extract_content_kind(message),
            length: extract_length(message),
        };
    }

    if PREDICTION_WORDS.is_match(message) {
        let pairs = extract_pairs(message);
        return Intent::Prediction {
            data: if pairs.is_empty() {
                prediction::demo_points()
            } else {
                pairs
            },
            target: prediction::DEFAULT_TARGET.to_string(),
        };
    }

    Intent::Generic {
        prompt: message.to_string(),
    }
}

fn extract_slide_count(message: &str) -> Option<i64> {
    SLIDE_COUNT
        .captures(message)
        .and_then(|caps| caps[1].parse().ok())
}

fn extract_topic(message: &str) -> String {
    let raw = match TOPIC_AFTER.captures(message) {
        Some(caps) => caps[1].to_string(),
        None => FILLER_WORDS.replace_all(message, " ").into_owned(),
    };

    let without_count = SLIDE_COUNT_PHRASE.replace_all(&raw, " ");
    let topic = without_count
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let topic = topic
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_string();

    if topic.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        topic
    }
}

fn extract_content_kind(message: &str) -> ContentKind {
    let lower = message.to_lowercase();
    if lower.contains("report") {
        ContentKind::Report
    } else if lower.contains("summary") {
        ContentKind::Summary
    } else if lower.contains("essay") {
        ContentKind::Essay
    } else {
        ContentKind::Article
    }
}

fn extract_length(message: &str) -> ContentLength {
    let lower = message.to_lowercase();
    if lower.contains("short") || lower.contains("brief") {
        ContentLength::Short
    } else if lower.contains("long") || lower.contains("detailed") || lower.contains("in-depth") {
        ContentLength::Long
    } else {
        ContentLength::Medium
    }
}

fn extract_pairs(message: &str) -> Vec<DataPoint> {
    PAIR.captures_iter(message)
        .filter_map(|caps| {
            let x = caps[1].parse().ok()?;
            let y = caps[2].parse().ok()?;
            Some(DataPoint::new(x, y))
        })
        .collect()
}

/// Routes chat messages to the generators.
#[derive(Clone)]
pub struct Orchestrator {
    llm: LlmProvider,
    presentation: PresentationService,
    content: ContentService,
}

impl Orchestrator {
    pub fn new(
        llm: LlmProvider,
        presentation: PresentationService,
        content: ContentService,
    ) -> Self {
        Self {
            llm,
            presentation,
            content,
        }
    }

    pub async fn handle(&self, message: &str) -> Result<ChatOutcome> {
        let intent = classify(message);
        info!(action = intent.action(), "Chat message classified");
        self.dispatch(intent).await
    }

    /// Runs exactly one generator for `intent`. Generator errors are returned unchanged.
    pub async fn dispatch(&self, intent: Intent) -> Result<ChatOutcome> {
        match intent {
            Intent::Presentation { topic, slides } => self
                .presentation
                .generate(&topic, slides)
                .await
                .map(ChatOutcome::Presentation),
            Intent::Content {
                topic,
                kind,
                length,
            } => self
                .content
                .generate(&topic, kind, length)
                .await
                .map(ChatOutcome::Content),
            // The chat path only carries (x, y) pairs, so the target is informational.
            Intent::Prediction { data, .. } => {
                prediction::predict_points(&data).map(ChatOutcome::Prediction)
            }
            Intent::Generic { prompt } => {
                let response = self
                    .llm
                    .complete_with_system(&prompt, Some(prompts::GENERIC_SYSTEM_PROMPT), None)
                    .await?;
                Ok(ChatOutcome::Generic { response })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn presentation_request_extracts_topic_and_count() {
        assert_eq!(
            classify("Create a 5-slide presentation about renewable energy"),
            Intent::Presentation {
                topic: "renewable energy".to_string(),
                slides: Some(5),
            }
        );
        assert_eq!(
            classify("make a deck on Rust with 3 slides."),
            Intent::Presentation {
                topic: "Rust".to_string(),
                slides: Some(3),
            }
        );
    }

    #[test]
    fn presentation_without_count_uses_default() {
        match classify("PowerPoint regarding ocean currents") {
            Intent::Presentation { topic, slides } => {
                assert_eq!(topic, "ocean currents");
                assert_eq!(slides, None);
            }
            other => panic!("Expected presentation, got {other:?}"),
        }
    }

    #[test]
    fn presentation_beats_content_keywords() {
        assert_eq!(
            classify("write slides about history").action(),
            "presentation"
        );
    }

    #[test]
    fn content_request_extracts_kind_and_length() {
        assert_eq!(
            classify("Write a short report on machine learning"),
            Intent::Content {
                topic: "machine learning".to_string(),
                kind: ContentKind::Report,
                length: ContentLength::Short,
            }
        );
        match classify("I need a detailed essay about the Roman empire") {
            Intent::Content {
                topic,
                kind,
                length,
            } => {
                assert_eq!(kind, ContentKind::Essay);
                assert_eq!(length, ContentLength::Long);
                assert_eq!(topic, "the Roman empire");
            }
            other => panic!("Expected content, got {other:?}"),
        }
    }

    #[test]
    fn topic_falls_back_to_stripped_message() {
        match classify("write an article") {
            Intent::Content { topic, kind, .. } => {
                assert_eq!(topic, DEFAULT_TOPIC);
                assert_eq!(kind, ContentKind::Article);
            }
            other => panic!("Expected content, got {other:?}"),
        }
        match classify("generate slides quantum computing") {
            Intent::Presentation { topic, .. } => assert_eq!(topic, "quantum computing"),
            other => panic!("Expected presentation, got {other:?}"),
        }
    }

    #[test]
    fn trailing_preposition_falls_back_to_default_topic() {
        match classify("write an essay about") {
            Intent::Content { topic, kind, .. } => {
                assert_eq!(topic, DEFAULT_TOPIC);
                assert_eq!(kind, ContentKind::Essay);
            }
            other => panic!("Expected content, got {other:?}"),
        }
        match classify("Create a presentation on") {
            Intent::Presentation { topic, .. } => assert_eq!(topic, DEFAULT_TOPIC),
            other => panic!("Expected presentation, got {other:?}"),
        }
        match classify("slides regarding") {
            Intent::Presentation { topic, .. } => assert_eq!(topic, DEFAULT_TOPIC),
            other => panic!("Expected presentation, got {other:?}"),
        }
    }

    #[test]
    fn prediction_parses_pairs_or_uses_demo_data() {
        match classify("predict y for (1, 2) (2, 4.5) (3,-1)") {
            Intent::Prediction { data, target } => {
                assert_eq!(target, "y");
                assert_eq!(
                    data,
                    vec![
                        DataPoint::new(1.0, 2.0),
                        DataPoint::new(2.0, 4.5),
                        DataPoint::new(3.0, -1.0)
                    ]
                );
            }
            other => panic!("Expected prediction, got {other:?}"),
        }

        match classify("run a regression") {
            Intent::Prediction { data, .. } => assert_eq!(data, prediction::demo_points()),
            other => panic!("Expected prediction, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_message_is_generic() {
        assert_eq!(
            classify("  What is the capital of France? "),
            Intent::Generic {
                prompt: "What is the capital of France?".to_string()
            }
        );
    }

    #[test]
    fn classification_is_idempotent() {
        for message in [
            "Create a 5-slide presentation about renewable energy",
            "write a summary on tides",
            "forecast (1,1) (2,2)",
            "hello there",
        ] {
            assert_eq!(classify(message), classify(message));
        }
    }
}
