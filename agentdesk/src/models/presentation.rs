use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One slide of a generated deck. The first slide of a deck is its title slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
}

impl Slide {
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
        }
    }
}

/// Background and accent colours as `RRGGBB` hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: &'static str,
    pub accent: &'static str,
}

const PALETTES: [Theme; 3] = [
    Theme {
        background: "F0F8FF",
        accent: "0066CC",
    },
    Theme {
        background: "F0FFF0",
        accent: "228B22",
    },
    Theme {
        background: "FFF0F0",
        accent: "B22222",
    },
];

impl Theme {
    /// Picks a palette from the topic hash so a topic always renders the same way.
    pub fn for_topic(topic: &str) -> Self {
        let digest = Sha256::digest(topic.trim().to_lowercase().as_bytes());
        PALETTES[digest[0] as usize % PALETTES.len()]
    }
}
