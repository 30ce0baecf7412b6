//! Trimming raw clips to their voice-over and muxing the two together.
//!
//! The audio duration is the single source of truth for a sub-unit's length.
//! The raw clip is cut to exactly that duration and re-encoded at the
//! canonical profile with audio stripped, then the voice-over is muxed in with
//! the video stream copied untouched. The mux never uses `-shortest`; the trim
//! already decided the length.

use std::path::Path;
use std::sync::Arc;

use spotcut_common::{SpotcutError, SpotcutResult};
use spotcut_script_model::CanonicalProfile;

use crate::exec::{run_tool, ToolRunner, FFMPEG};
use crate::normalize::{encoder_args, scale_pad_filter};
use crate::probe::Prober;

/// Cuts raw footage to voice-over length and pairs the streams.
#[derive(Clone)]
pub struct TrimMuxer {
    runner: Arc<dyn ToolRunner>,
    prober: Prober,
    profile: CanonicalProfile,
}

impl TrimMuxer {
    pub fn new(runner: Arc<dyn ToolRunner>, prober: Prober, profile: CanonicalProfile) -> Self {
        Self {
            runner,
            prober,
            profile,
        }
    }

    /// Produce a sub-clip at `output` whose video is `raw` cut to the length
    /// of `audio`. Returns the probed audio duration in seconds.
    pub async fn process(&self, raw: &Path, audio: &Path, output: &Path) -> SpotcutResult<f64> {
        let duration = self.prober.duration(audio).await?;
        tracing::debug!(
            raw = %raw.display(),
            duration_secs = duration,
            "Trimming clip to voice-over length"
        );

        let trimmed = raw.with_extension("trimmed.mp4");
        self.trim(raw, duration, &trimmed).await?;
        self.mux(&trimmed, audio, output).await?;

        if let Err(e) = tokio::fs::remove_file(&trimmed).await {
            tracing::warn!(path = %trimmed.display(), error = %e, "Could not remove trim intermediate");
        }

        Ok(duration)
    }

    async fn trim(&self, raw: &Path, duration: f64, trimmed: &Path) -> SpotcutResult<()> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            raw.display().to_string(),
            "-ss".to_string(),
            "0".to_string(),
            "-t".to_string(),
            format!("{duration:.6}"),
            "-vf".to_string(),
            scale_pad_filter(&self.profile),
        ];
        args.extend(encoder_args(&self.profile));
        args.push("-an".to_string());
        args.push(trimmed.display().to_string());

        let result = run_tool(self.runner.clone(), FFMPEG, args)
            .await
            .map_err(|e| SpotcutError::mux(format!("failed to run ffmpeg: {e}")))?;

        if !result.success() {
            return Err(SpotcutError::mux(format!(
                "ffmpeg trim failed for {} (status {}): {}",
                raw.display(),
                result.status,
                result.stderr.trim()
            )));
        }
        Ok(())
    }

    async fn mux(&self, trimmed: &Path, audio: &Path, output: &Path) -> SpotcutResult<()> {
        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            trimmed.display().to_string(),
            "-i".to_string(),
            audio.display().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.profile.audio_bitrate_kbps),
            "-map".to_string(),
            "0:v".to_string(),
            "-map".to_string(),
            "1:a".to_string(),
            output.display().to_string(),
        ];

        let result = run_tool(self.runner.clone(), FFMPEG, args)
            .await
            .map_err(|e| SpotcutError::mux(format!("failed to run ffmpeg: {e}")))?;

        if !result.success() {
            return Err(SpotcutError::mux(format!(
                "ffmpeg mux failed for {} (status {}): {}",
                output.display(),
                result.status,
                result.stderr.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::{failed_output, ok_output, probe_output, FakeRunner};
    use crate::exec::FFPROBE;

    fn audio_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("line.mp3");
        std::fs::write(&path, b"mp3").unwrap();
        path
    }

    #[tokio::test]
    async fn test_process_trims_to_audio_duration_then_muxes() {
        let dir = tempfile::tempdir().unwrap();
        let audio = audio_file(&dir);
        let raw = dir.path().join("raw.mp4");
        let output = dir.path().join("scene001_sub001_av.mp4");

        let fake = FakeRunner::new(|program, _| {
            if program == FFPROBE {
                probe_output(4.2, false, true)
            } else {
                ok_output()
            }
        });
        let muxer = TrimMuxer::new(
            fake.clone(),
            Prober::new(fake.clone()),
            CanonicalProfile::default(),
        );

        let duration = muxer.process(&raw, &audio, &output).await.unwrap();
        assert!((duration - 4.2).abs() < 1e-9);

        let calls = fake.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].0, FFPROBE);

        let trim_args = &calls[1].1;
        let t_at = trim_args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(trim_args[t_at + 1], "4.200000");
        assert!(trim_args.contains(&"-an".to_string()));
        assert!(trim_args.iter().any(|a| a.starts_with("scale=1920:1080")));

        let mux_args = &calls[2].1;
        assert!(mux_args.contains(&"copy".to_string()));
        assert!(mux_args.contains(&"0:v".to_string()));
        assert!(mux_args.contains(&"1:a".to_string()));
        assert!(!mux_args.contains(&"-shortest".to_string()));
        assert_eq!(mux_args.last().unwrap(), output.to_str().unwrap());
    }

    #[tokio::test]
    async fn test_trim_length_follows_audio_not_source() {
        // Voice-over both much shorter and much longer than typical footage;
        // the cut length is the probed audio duration either way. The fake
        // never writes the trim intermediate, so its cleanup failing must
        // stay silent.
        for (duration, expected) in [(0.75, "0.750000"), (95.0, "95.000000")] {
            let dir = tempfile::tempdir().unwrap();
            let audio = audio_file(&dir);
            let fake = FakeRunner::new(move |program, _| {
                if program == FFPROBE {
                    probe_output(duration, false, true)
                } else {
                    ok_output()
                }
            });
            let muxer = TrimMuxer::new(
                fake.clone(),
                Prober::new(fake.clone()),
                CanonicalProfile::default(),
            );

            let got = muxer
                .process(
                    &dir.path().join("raw.mp4"),
                    &audio,
                    &dir.path().join("out.mp4"),
                )
                .await
                .unwrap();
            assert!((got - duration).abs() < 1e-9);

            let trim_args = &fake.calls()[1].1;
            let t_at = trim_args.iter().position(|a| a == "-t").unwrap();
            assert_eq!(trim_args[t_at + 1], expected);
        }
    }

    #[tokio::test]
    async fn test_process_trim_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let audio = audio_file(&dir);

        let fake = FakeRunner::new(|program, _| {
            if program == FFPROBE {
                probe_output(2.0, false, true)
            } else {
                failed_output("corrupt frame")
            }
        });
        let muxer = TrimMuxer::new(
            fake.clone(),
            Prober::new(fake.clone()),
            CanonicalProfile::default(),
        );

        let err = muxer
            .process(
                &dir.path().join("raw.mp4"),
                &audio,
                &dir.path().join("out.mp4"),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("trim failed"));
        assert!(err.to_string().contains("corrupt frame"));
    }

    #[tokio::test]
    async fn test_process_missing_audio_is_probe_error() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeRunner::succeeding(1.0);
        let muxer = TrimMuxer::new(
            fake.clone(),
            Prober::new(fake.clone()),
            CanonicalProfile::default(),
        );

        let err = muxer
            .process(
                &dir.path().join("raw.mp4"),
                &dir.path().join("missing.mp3"),
                &dir.path().join("out.mp4"),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(fake.calls().is_empty());
    }
}
