//! Duration and stream inspection via ffprobe.
//!
//! The probe asks for JSON output and parses only the fields the pipeline
//! needs: the container duration and the codec type of each stream.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use spotcut_common::{SpotcutError, SpotcutResult};

use crate::exec::{run_tool, ToolRunner, FFPROBE};

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    format: Option<FormatSection>,
    #[serde(default)]
    streams: Vec<StreamSection>,
}

#[derive(Debug, Deserialize)]
struct FormatSection {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamSection {
    codec_type: Option<String>,
}

/// What a probe learned about a media file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration_secs: f64,

    /// Whether at least one video stream is present.
    pub has_video: bool,

    /// Whether at least one audio stream is present.
    pub has_audio: bool,
}

/// Inspects media files through the injected runner.
#[derive(Clone)]
pub struct Prober {
    runner: Arc<dyn ToolRunner>,
}

impl Prober {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// Duration of the file in seconds.
    pub async fn duration(&self, path: &Path) -> SpotcutResult<f64> {
        let doc = self.run_probe(path, "format=duration").await?;
        parse_duration(&doc, path)
    }

    /// Duration plus stream presence, used for output verification.
    pub async fn inspect(&self, path: &Path) -> SpotcutResult<MediaInfo> {
        let doc = self
            .run_probe(path, "format=duration:stream=codec_type")
            .await?;
        let duration_secs = parse_duration(&doc, path)?;
        let has_video = doc
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("video"));
        let has_audio = doc
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio"));
        Ok(MediaInfo {
            duration_secs,
            has_video,
            has_audio,
        })
    }

    async fn run_probe(&self, path: &Path, entries: &str) -> SpotcutResult<ProbeDocument> {
        if !path.exists() {
            return Err(SpotcutError::probe(format!(
                "file does not exist: {}",
                path.display()
            )));
        }

        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            entries.to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.display().to_string(),
        ];

        let output = run_tool(self.runner.clone(), FFPROBE, args)
            .await
            .map_err(|e| SpotcutError::probe(format!("failed to run ffprobe: {e}")))?;

        if !output.success() {
            return Err(SpotcutError::probe(format!(
                "ffprobe failed for {} (status {}): {}",
                path.display(),
                output.status,
                output.stderr.trim()
            )));
        }

        serde_json::from_str(&output.stdout).map_err(|e| {
            SpotcutError::probe(format!(
                "unparseable ffprobe output for {}: {e}",
                path.display()
            ))
        })
    }
}

fn parse_duration(doc: &ProbeDocument, path: &Path) -> SpotcutResult<f64> {
    let text = doc
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .ok_or_else(|| {
            SpotcutError::probe(format!("no duration reported for {}", path.display()))
        })?;

    let secs: f64 = text.parse().map_err(|_| {
        SpotcutError::probe(format!(
            "non-numeric duration {:?} for {}",
            text,
            path.display()
        ))
    })?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(SpotcutError::probe(format!(
            "invalid duration {secs} for {}",
            path.display()
        )));
    }

    Ok(secs)
}
