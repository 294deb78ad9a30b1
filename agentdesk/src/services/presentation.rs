use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::artifacts::ArtifactStore;
use crate::config::PresentationConfig;
use crate::error::{DeskError, Result};
use crate::llm::{prompts, CompletionOptions, LlmProvider};
use crate::models::{Slide, Theme};
use crate::render::render_pptx;

// Tokens budgeted per requested slide, on top of a fixed allowance.
const TOKENS_PER_SLIDE: u32 = 120;
const BASE_TOKENS: u32 = 200;

static SLIDE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[#*_\s]*slide\s+(\d+)\s*[:.)\-]?\s*(.*)$")
        .expect("Failed to compile slide heading regex")
});

// Symbol markers may run straight into the text (`*Point`); numbered ones need a space.
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[*\-•]\s*|\d+[.)]\s+)(.+)$").expect("Failed to compile bullet regex")
});

/// A generated deck, already written to the artifact store.
#[derive(Debug, Clone)]
pub struct PresentationOutcome {
    pub filename: String,
    pub topic: String,
    pub slides: Vec<Slide>,
    pub slides_requested: u32,
}

impl PresentationOutcome {
    pub fn titles(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.title.clone()).collect()
    }
}

#[derive(Clone)]
pub struct PresentationService {
    llm: LlmProvider,
    artifacts: ArtifactStore,
    policy: PresentationConfig,
}

impl PresentationService {
    pub fn new(llm: LlmProvider, artifacts: ArtifactStore, policy: PresentationConfig) -> Self {
        Self {
            llm,
            artifacts,
            policy,
        }
    }

    /// Asks the LLM for a deck outline, renders it and stores the `.pptx`.
    ///
    /// `requested` is clamped into the configured slide range; `None` uses the default.
    pub async fn generate(
        &self,
        topic: &str,
        requested: Option<i64>,
    ) -> Result<PresentationOutcome> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DeskError::Validation("topic must not be empty".to_string()));
        }

        let count = self.policy.resolve(requested);
        info!(topic, slides = count, "Generating presentation");

        let prompt = prompts::presentation_prompt(topic, count);
        let options = CompletionOptions::with_max_tokens(outline_token_budget(count));
        let response = self.llm.complete(&prompt, Some(&options)).await?;
        debug!(chars = response.len(), "Presentation outline received");

        let parsed = parse_slides(&response);
        if parsed.is_empty() {
            warn!(topic, "LLM response contained no parseable slides");
            return Err(DeskError::Llm(
                "LLM response did not contain any slides".to_string(),
            ));
        }
        let slides = fit_slide_count(parsed, count as usize, topic);

        let bytes = render_pptx(&slides, Theme::for_topic(topic))?;
        let filename = ArtifactStore::unique_name("AI", topic, "presentation", "pptx");
        self.artifacts.write(&filename, &bytes).await?;

        info!(
            topic,
            filename = filename.as_str(),
            slides = slides.len(),
            "Presentation created"
        );

        Ok(PresentationOutcome {
            filename,
            topic: topic.to_string(),
            slides,
            slides_requested: count,
        })
    }
}

fn outline_token_budget(count: u32) -> u32 {
    TOKENS_PER_SLIDE.saturating_mul(count).saturating_add(BASE_TOKENS)
}

/// Parses `SLIDE n: Title` blocks and their bullets out of an LLM response.
///
/// Markdown emphasis and heading markers around headings are ignored, and
/// `*`, `-`, `•` or numbered bullets are accepted. Text before the first
/// heading is dropped.
pub fn parse_slides(text: &str) -> Vec<Slide> {
    let mut slides: Vec<Slide> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = SLIDE_HEADING.captures(line) {
            let title = clean_fragment(caps.get(2).map_or("", |m| m.as_str()));
            slides.push(Slide::new(title, Vec::new()));
            continue;
        }

        let Some(current) = slides.last_mut() else {
            continue;
        };
        if is_emphasis_only(line) {
            continue;
        }
        if let Some(caps) = BULLET.captures(line) {
            let bullet = clean_fragment(&caps[1]);
            // Skips rules such as `---` or `***`.
            if bullet.chars().any(char::is_alphanumeric) {
                current.bullets.push(bullet);
            }
        }
    }

    for (index, slide) in slides.iter_mut().enumerate() {
        if slide.title.is_empty() {
            slide.title = format!("Slide {}", index + 1);
        }
    }

    slides
}

/// A line such as `**Key takeaways**` is a bold label, not a bullet.
fn is_emphasis_only(line: &str) -> bool {
    let line = line.trim();
    line.len() > 4
        && line.starts_with("**")
        && line.ends_with("**")
        && !line[2..line.len() - 2].contains("**")
}

/// Strips markdown emphasis, template brackets and surrounding whitespace.
fn clean_fragment(raw: &str) -> String {
    raw.replace("**", "")
        .replace("__", "")
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '#' | '[' | ']' | '`'))
        .trim()
        .to_string()
}

/// Drops extra slides and pads missing ones with neutral placeholder content.
fn fit_slide_count(mut slides: Vec<Slide>, count: usize, topic: &str) -> Vec<Slide> {
    if slides.len() > count {
        debug!(parsed = slides.len(), count, "Dropping extra slides");
        slides.truncate(count);
    }

    while slides.len() < count {
        let number = slides.len() + 1;
        slides.push(Slide::new(
            format!("{topic} Slide {number}"),
            vec![
                "Point A".to_string(),
                "Point B".to_string(),
                "Point C".to_string(),
            ],
        ));
    }

    slides
}
