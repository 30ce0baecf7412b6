//! Filter-graph concatenation with output verification.
//!
//! Inputs are first re-encoded to the canonical profile in a scratch
//! directory, then joined in a single ffmpeg run through the `concat` filter.
//! The output is probed afterwards; a duration drift beyond the tolerance or
//! a missing stream downgrades to a warning rather than failing a render
//! that already produced a file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spotcut_common::{SpotcutError, SpotcutResult};

use crate::exec::{run_tool, ToolRunner, FFMPEG};
use crate::normalize::{audio_encoder_args, encoder_args, Normalizer};
use crate::probe::Prober;

/// Outcome of a concatenation, including verification findings.
#[derive(Debug, Clone)]
pub struct ConcatReport {
    /// The produced file.
    pub output: PathBuf,

    /// Sum of the normalized input durations.
    pub expected_secs: f64,

    /// Probed duration of the output, when verification succeeded.
    pub measured_secs: Option<f64>,

    /// Non-fatal verification findings.
    pub warnings: Vec<String>,
}

/// Build the `concat` filter graph for `n` inputs.
pub fn build_concat_filter(n: usize, has_audio: bool) -> String {
    let mut filter = String::new();
    for i in 0..n {
        filter.push_str(&format!("[{i}:v]"));
        if has_audio {
            filter.push_str(&format!("[{i}:a]"));
        }
    }
    if has_audio {
        filter.push_str(&format!("concat=n={n}:v=1:a=1[outv][outa]"));
    } else {
        filter.push_str(&format!("concat=n={n}:v=1:a=0[outv]"));
    }
    filter
}

/// Joins clips end to end at the canonical profile.
#[derive(Clone)]
pub struct Concatenator {
    runner: Arc<dyn ToolRunner>,
    prober: Prober,
    normalizer: Normalizer,
    tolerance_secs: f64,
}

impl Concatenator {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        prober: Prober,
        normalizer: Normalizer,
        tolerance_secs: f64,
    ) -> Self {
        Self {
            runner,
            prober,
            normalizer,
            tolerance_secs,
        }
    }

    /// Concatenate `clips` in order into `output`.
    pub async fn concatenate(
        &self,
        clips: &[PathBuf],
        output: &Path,
        has_audio: bool,
    ) -> SpotcutResult<ConcatReport> {
        if clips.is_empty() {
            return Err(SpotcutError::concat("no clips to concatenate"));
        }

        tracing::info!(
            clips = clips.len(),
            output = %output.display(),
            "Concatenating clips"
        );

        let workdir = tempfile::tempdir()?;
        let mut normalized = Vec::with_capacity(clips.len());
        let mut expected_secs = 0.0;
        for (i, clip) in clips.iter().enumerate() {
            let target = workdir.path().join(format!("normalized_{i:03}.mp4"));
            self.normalizer.normalize(clip, &target).await?;
            expected_secs += self.prober.duration(&target).await?;
            normalized.push(target);
        }

        self.run_concat(&normalized, output, has_audio).await?;

        let mut report = ConcatReport {
            output: output.to_path_buf(),
            expected_secs,
            measured_secs: None,
            warnings: Vec::new(),
        };
        self.verify(&mut report, has_audio).await;
        for warning in &report.warnings {
            tracing::warn!(output = %output.display(), "{warning}");
        }

        Ok(report)
    }

    async fn run_concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        has_audio: bool,
    ) -> SpotcutResult<()> {
        let profile = self.normalizer.profile();
        let mut args = vec!["-y".to_string()];
        for input in inputs {
            args.push("-i".to_string());
            args.push(input.display().to_string());
        }
        args.push("-filter_complex".to_string());
        args.push(build_concat_filter(inputs.len(), has_audio));
        args.push("-map".to_string());
        args.push("[outv]".to_string());
        if has_audio {
            args.push("-map".to_string());
            args.push("[outa]".to_string());
        }
        args.extend(encoder_args(profile));
        if has_audio {
            args.extend(audio_encoder_args(profile));
        }
        args.push("-movflags".to_string());
        args.push("+faststart".to_string());
        args.push(output.display().to_string());

        let result = run_tool(self.runner.clone(), FFMPEG, args)
            .await
            .map_err(|e| SpotcutError::concat(format!("failed to run ffmpeg: {e}")))?;

        if !result.success() {
            return Err(SpotcutError::concat(format!(
                "ffmpeg concat failed for {} (status {}): {}",
                output.display(),
                result.status,
                result.stderr.trim()
            )));
        }
        Ok(())
    }

    async fn verify(&self, report: &mut ConcatReport, has_audio: bool) {
        let info = match self.prober.inspect(&report.output).await {
            Ok(info) => info,
            Err(e) => {
                report
                    .warnings
                    .push(format!("could not verify output: {e}"));
                return;
            }
        };

        report.measured_secs = Some(info.duration_secs);
        let drift = (info.duration_secs - report.expected_secs).abs();
        if drift > self.tolerance_secs {
            report.warnings.push(format!(
                "duration drift {drift:.2}s (expected {:.2}s, measured {:.2}s)",
                report.expected_secs, info.duration_secs
            ));
        }
        if !info.has_video {
            report.warnings.push("output has no video stream".to_string());
        }
        if has_audio && !info.has_audio {
            report.warnings.push("output has no audio stream".to_string());
        }
    }
}
