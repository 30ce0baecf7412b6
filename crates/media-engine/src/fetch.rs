//! Clip retrieval.
//!
//! A locator is either an http(s) URL, streamed to disk chunk by chunk, or a
//! local path, copied into place. Destinations are written whole; a failed
//! fetch leaves no partial file behind.

use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use spotcut_common::{SpotcutError, SpotcutResult};

/// Whether a locator points at a remote resource.
pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Downloads or copies source clips.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize `locator` at `dest`.
    pub async fn fetch(&self, locator: &str, dest: &Path) -> SpotcutResult<()> {
        if is_remote(locator) {
            self.download(locator, dest).await
        } else {
            self.copy_local(locator, dest).await
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> SpotcutResult<()> {
        tracing::debug!(url = %url, dest = %dest.display(), "Downloading clip");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SpotcutError::fetch(format!("GET {url}: {e}")))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| SpotcutError::fetch(format!("cannot create {}: {e}", dest.display())))?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| SpotcutError::fetch(format!("stream from {url}: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| SpotcutError::fetch(format!("write {}: {e}", dest.display())))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| SpotcutError::fetch(format!("flush {}: {e}", dest.display())))?;

        if written == 0 {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(SpotcutError::fetch(format!("empty response from {url}")));
        }

        tracing::debug!(bytes = written, "Download complete");
        Ok(())
    }

    async fn copy_local(&self, source: &str, dest: &Path) -> SpotcutResult<()> {
        let source_path = Path::new(source);
        if !source_path.exists() {
            return Err(SpotcutError::fetch(format!(
                "local clip does not exist: {source}"
            )));
        }

        tokio::fs::copy(source_path, dest)
            .await
            .map_err(|e| SpotcutError::fetch(format!("copy {source}: {e}")))?;
        Ok(())
    }
}
