//! Injected service boundaries.
//!
//! The pipeline never knows which vendor renders speech or where footage
//! comes from. Providers implement these traits; tests substitute fakes.

use std::path::Path;

use async_trait::async_trait;

use spotcut_common::SpotcutResult;

/// Renders a spoken line to an audio file.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `line` as speech into `dest`. The file must exist and be
    /// complete when this returns `Ok`.
    async fn render(&self, line: &str, dest: &Path) -> SpotcutResult<()>;
}

/// Finds source footage for a visual description.
#[async_trait]
pub trait ClipLocator: Send + Sync {
    /// Best matching clip locator (a URL or local path), or `None` when the
    /// search came back empty.
    async fn locate(&self, description: &str) -> SpotcutResult<Option<String>>;
}
