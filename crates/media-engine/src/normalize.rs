//! Re-encoding clips to the canonical profile.
//!
//! Heterogeneous inputs are scaled to fit inside the target frame, padded to
//! the exact dimensions, and re-encoded with pinned keyframes so that every
//! clip entering a concat filter carries identical stream parameters.

use std::path::Path;
use std::sync::Arc;

use spotcut_common::{SpotcutError, SpotcutResult};
use spotcut_script_model::CanonicalProfile;

use crate::exec::{run_tool, ToolRunner, FFMPEG};

/// Scale-to-fit-then-pad filter preserving the source aspect ratio.
pub fn scale_pad_filter(profile: &CanonicalProfile) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = profile.width,
        h = profile.height
    )
}

/// Video encoder arguments shared by every re-encode in the pipeline.
pub fn encoder_args(profile: &CanonicalProfile) -> Vec<String> {
    vec![
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "ultrafast".to_string(),
        "-r".to_string(),
        profile.frame_rate.to_string(),
        "-b:v".to_string(),
        format!("{}k", profile.video_bitrate_kbps),
        "-maxrate".to_string(),
        format!("{}k", profile.video_bitrate_kbps),
        "-bufsize".to_string(),
        format!("{}k", profile.bufsize_kbps()),
        "-pix_fmt".to_string(),
        profile.pixel_format.clone(),
        "-g".to_string(),
        profile.keyframe_interval.to_string(),
        "-keyint_min".to_string(),
        profile.keyframe_interval.to_string(),
        "-sc_threshold".to_string(),
        "0".to_string(),
        "-profile:v".to_string(),
        "high".to_string(),
        "-level".to_string(),
        "4.0".to_string(),
    ]
}

/// Audio encoder arguments matching the canonical profile.
pub fn audio_encoder_args(profile: &CanonicalProfile) -> Vec<String> {
    vec![
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", profile.audio_bitrate_kbps),
    ]
}

/// Re-encodes single clips to the canonical profile.
#[derive(Clone)]
pub struct Normalizer {
    runner: Arc<dyn ToolRunner>,
    profile: CanonicalProfile,
}

impl Normalizer {
    pub fn new(runner: Arc<dyn ToolRunner>, profile: CanonicalProfile) -> Self {
        Self { runner, profile }
    }

    pub fn profile(&self) -> &CanonicalProfile {
        &self.profile
    }

    /// Re-encode `input` into `output` at the canonical profile.
    pub async fn normalize(&self, input: &Path, output: &Path) -> SpotcutResult<()> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-vf".to_string(),
            scale_pad_filter(&self.profile),
        ];
        args.extend(encoder_args(&self.profile));
        args.extend(audio_encoder_args(&self.profile));
        args.push(output.display().to_string());

        tracing::debug!(input = %input.display(), output = %output.display(), "Normalizing clip");

        let result = run_tool(self.runner.clone(), FFMPEG, args)
            .await
            .map_err(|e| SpotcutError::normalize(format!("failed to run ffmpeg: {e}")))?;

        if !result.success() {
            return Err(SpotcutError::normalize(format!(
                "ffmpeg normalize failed for {} (status {}): {}",
                input.display(),
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
    use crate::exec::testing::{failed_output, FakeRunner};

    #[test]
    fn test_scale_pad_filter_targets_profile_dimensions() {
        let filter = scale_pad_filter(&CanonicalProfile::default());
        assert_eq!(
            filter,
            "scale=1920:1080:force_original_aspect_ratio=decrease,pad=1920:1080:(ow-iw)/2:(oh-ih)/2"
        );
    }

    #[test]
    fn test_encoder_args_pin_keyframes_to_frame_rate() {
        let profile = CanonicalProfile::default();
        let args = encoder_args(&profile);

        let find = |flag: &str| {
            let at = args.iter().position(|a| a == flag).unwrap();
            args[at + 1].clone()
        };
        assert_eq!(find("-g"), "30");
        assert_eq!(find("-keyint_min"), "30");
        assert_eq!(find("-sc_threshold"), "0");
        assert_eq!(find("-b:v"), "5000k");
        assert_eq!(find("-bufsize"), "10000k");
    }

    #[tokio::test]
    async fn test_normalize_builds_expected_invocation() {
        let fake = FakeRunner::succeeding(1.0);
        let normalizer = Normalizer::new(fake.clone(), CanonicalProfile::default());

        normalizer
            .normalize(Path::new("/in/raw.mp4"), Path::new("/out/norm.mp4"))
            .await
            .unwrap();

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        let (program, args) = &calls[0];
        assert_eq!(program, FFMPEG);
        assert_eq!(args[0], "-y");
        assert!(args.contains(&"-vf".to_string()));
        assert!(args.iter().any(|a| a.starts_with("scale=1920:1080")));
        assert_eq!(args.last().unwrap(), "/out/norm.mp4");
    }

    #[tokio::test]
    async fn test_normalize_follows_custom_profile() {
        let profile = CanonicalProfile {
            width: 1280,
            height: 720,
            frame_rate: 25,
            video_bitrate_kbps: 2500,
            keyframe_interval: 25,
            audio_bitrate_kbps: 128,
            ..CanonicalProfile::default()
        };
        let fake = FakeRunner::succeeding(1.0);
        let normalizer = Normalizer::new(fake.clone(), profile);

        normalizer
            .normalize(Path::new("/in/raw.mp4"), Path::new("/out/norm.mp4"))
            .await
            .unwrap();

        let (_, args) = &fake.calls()[0];
        let find = |flag: &str| {
            let at = args.iter().position(|a| a == flag).unwrap();
            args[at + 1].clone()
        };
        assert!(args.iter().any(|a| a.starts_with("scale=1280:720")));
        assert_eq!(find("-r"), "25");
        assert_eq!(find("-b:v"), "2500k");
        assert_eq!(find("-maxrate"), "2500k");
        assert_eq!(find("-bufsize"), "5000k");
        assert_eq!(find("-g"), "25");
        assert_eq!(find("-b:a"), "128k");
    }

    #[tokio::test]
    async fn test_normalize_failure_carries_stderr() {
        let fake = FakeRunner::new(|_, _| failed_output("Invalid data found"));
        let normalizer = Normalizer::new(fake, CanonicalProfile::default());

        let err = normalizer
            .normalize(Path::new("/in/raw.mp4"), Path::new("/out/norm.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid data found"));
    }
}
