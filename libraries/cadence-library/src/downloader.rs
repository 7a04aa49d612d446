/// yt-dlp downloader - search, extract audio, convert to mp3
use crate::error::{LibraryError, Result};
use async_trait::async_trait;
use cadence_core::{DownloadService, DownloadSource};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// Output template: files land as `<title>.mp3`
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Download service backed by the `yt-dlp` executable
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    program: PathBuf,
    dir: PathBuf,
}

impl YtDlpDownloader {
    /// Downloader running `program` with `dir` as working directory
    pub fn new(program: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dir: dir.into(),
        }
    }

    /// Program that is invoked
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for one search download
    pub fn args(query: &str, source: DownloadSource) -> Vec<String> {
        vec![
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            "192".to_string(),
            "-o".to_string(),
            OUTPUT_TEMPLATE.to_string(),
            format!("{}:{}", source.search_prefix(), query),
        ]
    }

    /// Run one download; the library must be re-listed afterwards
    pub async fn fetch(&self, query: &str, source: DownloadSource) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LibraryError::InvalidInput("empty download query".to_string()));
        }

        info!(%source, query, "starting download");
        let output = Command::new(&self.program)
            .args(Self::args(query, source))
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            warn!(status = %output.status, "download failed");
            return Err(LibraryError::Download(format!(
                "{}\nOutput: {}",
                output.status,
                combined.trim_end()
            )));
        }

        info!(%source, query, "download finished");
        Ok(())
    }
}

#[async_trait]
impl DownloadService for YtDlpDownloader {
    async fn fetch_by_query(&self, query: &str, source: DownloadSource) -> cadence_core::Result<()> {
        Ok(self.fetch(query, source).await?)
    }
}
