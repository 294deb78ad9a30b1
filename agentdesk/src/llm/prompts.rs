//! Prompt templates for the generators.
//!
//! These templates use basic `format!()` interpolation for type safety.

use crate::models::{ContentKind, LengthSpec};

/// System prompt for free-form chat that matched no generator.
pub const GENERIC_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer clearly and concisely in plain text.";

/// Generate the single prompt that yields a whole slide deck outline
///
/// The response format is `SLIDE n: Title` followed by `*` bullets, which
/// [`crate::services::presentation::parse_slides`] understands.
///
/// # Example
/// ```
/// use agentdesk::llm::prompts::presentation_prompt;
///
/// let prompt = presentation_prompt("renewable energy", 5);
/// assert!(prompt.contains("renewable energy"));
/// assert!(prompt.contains("exactly 5 slides"));
/// ```
pub fn presentation_prompt(topic: &str, slides: u32) -> String {
    format!(
        r#"Create a presentation about "{topic}".

Create exactly {slides} slides using the following structured format. Fill in everything between square brackets, keeping the rest of the template as is:

SLIDE 1: [Main Topic Title]
* [Short subtitle or overview point]
* [Key overview point]

SLIDE 2: [Specific Aspect]
* [Key point 1]
* [Key point 2]
* [Key point 3]

SLIDE [n]: [Another Key Aspect]
* [Key point 1]
* [Key point 2]
* [Key point 3]

- Follow the format exactly, for {slides} slides.
- Do not add extra slides, sections, text, or markdown.
- At least 3 key points per content slide, max 5.
- Every point should be a concise, punchy phrase (max 10 words, no period at the end).
- Titles should be engaging and informative (max 7 words)."#
    )
}

/// Generate a writing prompt for the requested content kind and length
///
/// Unknown kinds fall back to a generic "detailed content" prompt.
///
/// # Example
/// ```
/// use agentdesk::llm::prompts::content_prompt;
/// use agentdesk::models::{ContentKind, ContentLength};
///
/// let prompt = content_prompt("machine learning", &ContentKind::Report, &ContentLength::Long.spec());
/// assert!(prompt.contains("professional report"));
/// assert!(prompt.contains("800-1200 words"));
/// ```
pub fn content_prompt(topic: &str, kind: &ContentKind, sizing: &LengthSpec) -> String {
    let words = sizing.words;
    let sections = sizing.sections;

    match kind {
        ContentKind::Article => format!(
            r#"Write a comprehensive article about "{topic}".

Requirements:
- Length: {words} words
- Include {sections} main sections
- Make it informative and engaging
- Use clear headings and structure
- Include specific examples and details
- Professional tone
- Write in plain text format with clear section headers

Do not use markdown formatting. Use simple text formatting only."#
        ),
        ContentKind::Report => format!(
            r#"Write a professional report about "{topic}".

Requirements:
- Executive summary
- Key findings and analysis
- Data-driven insights
- Recommendations
- Length: {words} words
- Formal business tone
- Write in plain text format with clear sections

Do not use markdown formatting. Use simple text formatting only."#
        ),
        ContentKind::Summary => format!(
            r#"Write a comprehensive summary about "{topic}".

Requirements:
- Cover key points and concepts
- Highlight important facts
- Easy to understand
- Length: {words} words
- Use bullet points where appropriate
- Write in plain text format

Do not use markdown formatting. Use simple text formatting only."#
        ),
        ContentKind::Essay => format!(
            r#"Write a well-argued essay about "{topic}".

Requirements:
- A clear thesis in the opening paragraph
- {sections} body sections that each develop one argument
- A conclusion that ties the arguments together
- Length: {words} words
- Thoughtful, articulate tone

Do not use markdown formatting. Use simple text formatting only."#
        ),
        ContentKind::Other(kind) => format!(
            "Write a {kind} with detailed content about \"{topic}\" in {words} words with {sections} main points. Use plain text formatting only."
        ),
    }
}
