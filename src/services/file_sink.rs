//! File Sink
//!
//! Where downloaded and saved files end up. The application writes into a
//! directory; names that already exist get a ` (n)` suffix instead of being
//! overwritten.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::utils::error::{AppError, AppResult};

#[async_trait]
pub trait FileSink: Send + Sync {
    /// Write `bytes` under (a variant of) `suggested_name`; returns the final path.
    async fn save(&self, suggested_name: &str, bytes: &[u8]) -> AppResult<PathBuf>;
}

/// Writes into one directory, created on first use
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

/// Give up after this many numbered variants of one name.
const MAX_VARIANTS: usize = 10_000;

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Strip path components and characters that are invalid in file names.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

/// `name (n).ext` for the n-th collision.
fn numbered_variant(name: &str, n: usize) -> String {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{} ({}).{}",
            stem.to_string_lossy(),
            n,
            ext.to_string_lossy()
        ),
        _ => format!("{} ({})", name, n),
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, suggested_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = sanitize_file_name(suggested_name);

        for n in 0..MAX_VARIANTS {
            let candidate = if n == 0 {
                self.dir.join(&name)
            } else {
                self.dir.join(numbered_variant(&name, n))
            };

            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await;

            match opened {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    info!(
                        "[FileSink] Saved {} bytes to {}",
                        bytes.len(),
                        candidate.display()
                    );
                    return Ok(candidate);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal(format!(
            "No free file name for {} in {}",
            name,
            self.dir.display()
        )))
    }
}
