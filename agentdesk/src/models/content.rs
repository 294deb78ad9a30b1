use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of written piece requested from the content writer.
///
/// Unknown kinds are kept verbatim and get a generic prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    #[default]
    Article,
    Report,
    Summary,
    Essay,
    Other(String),
}

impl ContentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Report => "report",
            ContentKind::Summary => "summary",
            ContentKind::Essay => "essay",
            ContentKind::Other(kind) => kind,
        }
    }

    /// Capitalized label for file headers, e.g. `Report`.
    pub fn title(&self) -> String {
        let kind = self.as_str();
        let mut chars = kind.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for ContentKind {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "article" => ContentKind::Article,
            "report" => ContentKind::Report,
            "summary" => ContentKind::Summary,
            "essay" => ContentKind::Essay,
            other => ContentKind::Other(other.to_string()),
        }
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    #[default]
    Medium,
    Long,
}

/// Word-count target and section count handed to the LLM prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthSpec {
    pub words: &'static str,
    pub sections: u32,
    pub max_tokens: u32,
}

impl ContentLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLength::Short => "short",
            ContentLength::Medium => "medium",
            ContentLength::Long => "long",
        }
    }

    pub fn spec(&self) -> LengthSpec {
        match self {
            ContentLength::Short => LengthSpec {
                words: "300-500",
                sections: 3,
                max_tokens: 800,
            },
            ContentLength::Medium => LengthSpec {
                words: "500-800",
                sections: 4,
                max_tokens: 1200,
            },
            ContentLength::Long => LengthSpec {
                words: "800-1200",
                sections: 5,
                max_tokens: 1800,
            },
        }
    }

    /// Lenient parse: anything unrecognized is medium.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for ContentLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "brief" => Ok(ContentLength::Short),
            "medium" => Ok(ContentLength::Medium),
            "long" | "detailed" | "in-depth" => Ok(ContentLength::Long),
            other => Err(format!("Unknown content length: {other}")),
        }
    }
}

impl fmt::Display for ContentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
