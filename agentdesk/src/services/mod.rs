mod content;
pub mod orchestrator;
pub mod prediction;
pub mod presentation;

pub use content::{preview, ContentOutcome, ContentService};
pub use orchestrator::{classify, ChatOutcome, Intent, Orchestrator};
pub use prediction::PredictionOutcome;
pub use presentation::{parse_slides, PresentationOutcome, PresentationService};
