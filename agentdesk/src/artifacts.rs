//! Output directory for generated files.
//!
//! Artifacts are written once and never updated. Names carry a random suffix
//! so concurrent requests on the same topic do not overwrite each other.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use nanoid::nanoid;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use crate::error::{DeskError, Result};

const MAX_STEM_CHARS: usize = 30;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("Failed to compile filename regex"));

/// Turns a free-text topic into a filename-safe stem.
///
/// `"AI: the future?"` becomes `"AI_the_future"`.
pub fn safe_stem(topic: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(topic.trim(), "");
    let truncated: String = cleaned.chars().take(MAX_STEM_CHARS).collect();
    truncated
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_string()
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: Arc<PathBuf>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(self.dir.as_path()).await?;
        Ok(())
    }

    /// Builds `<prefix>_<stem>_<id>.<ext>`; an empty stem becomes `fallback`.
    pub fn unique_name(prefix: &str, topic: &str, fallback: &str, ext: &str) -> String {
        let stem = safe_stem(topic);
        let stem = if stem.is_empty() {
            fallback
        } else {
            stem.as_str()
        };
        format!("{prefix}_{stem}_{}.{ext}", nanoid!(10))
    }

    /// Writes a new artifact. Fails instead of overwriting an existing file.
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(filename)?;
        self.ensure_dir().await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Artifact written");
        Ok(path)
    }

    /// Opens an existing artifact for streaming, returning the handle and its size.
    pub async fn open(&self, filename: &str) -> Result<(tokio::fs::File, u64)> {
        let path = self.resolve(filename)?;

        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeskError::NotFound(format!("File not found: {filename}")));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(DeskError::NotFound(format!("File not found: {filename}")));
        }

        Ok((file, metadata.len()))
    }

    /// Maps a bare filename into the output directory, rejecting anything path-like.
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let name = filename.trim();
        if name.is_empty()
            || name.starts_with('.')
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(DeskError::Validation(format!(
                "Invalid artifact filename: {filename}"
            )));
        }

        Ok(self.dir.join(name))
    }
}
