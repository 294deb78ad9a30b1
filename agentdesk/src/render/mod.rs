//! Artifact renderers: slide decks to `.pptx`, prose to headed plain text.

mod pptx;
mod text;

pub use pptx::{render_pptx, PPTX_MIME};
pub use text::render_text_document;
