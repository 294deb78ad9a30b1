//! Wire format for requests and responses. Domain outcomes are converted here.

pub mod chat;
pub mod content;
pub mod prediction;
pub mod presentation;

pub use chat::*;
pub use content::*;
pub use prediction::*;
pub use presentation::*;

/// Relative URL under which a stored artifact can be fetched.
pub fn download_url(filename: &str) -> String {
    format!("/download/{filename}")
}
