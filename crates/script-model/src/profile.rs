//! The canonical encoding profile.
//!
//! Every clip entering a concatenation must already conform to one fixed
//! profile; heterogeneous stock footage is normalized to it first. The
//! profile is invariant across a single pipeline run.

use serde::{Deserialize, Serialize};

/// Fixed target video parameters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProfile {
    /// Output width in pixels.
    pub width: u32,

    /// Output height in pixels.
    pub height: u32,

    /// Output frame rate.
    pub frame_rate: u32,

    /// Video bitrate in kbps; target and ceiling are the same value,
    /// enforced through the rate-control buffer.
    pub video_bitrate_kbps: u32,

    /// Output pixel format.
    pub pixel_format: String,

    /// Keyframe interval in frames. Held at one second of output
    /// (`frame_rate`) so concatenated segments stay seekable and uniform.
    pub keyframe_interval: u32,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,
}

impl Default for CanonicalProfile {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: 30,
            video_bitrate_kbps: 5000,
            pixel_format: "yuv420p".to_string(),
            keyframe_interval: 30,
            audio_bitrate_kbps: 192,
        }
    }
}

impl CanonicalProfile {
    /// Rate-control buffer size in kbps (twice the bitrate ceiling).
    pub fn bufsize_kbps(&self) -> u32 {
        self.video_bitrate_kbps * 2
    }

    /// Check the parameter combinations the encoder will reject.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("profile width/height must be non-zero".to_string());
        }
        if self.frame_rate == 0 {
            return Err("profile frame rate must be non-zero".to_string());
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            // yuv420p subsampling needs even dimensions.
            return Err("profile width/height must be even for yuv420p output".to_string());
        }
        if self.keyframe_interval == 0 {
            return Err("profile keyframe interval must be non-zero".to_string());
        }
        Ok(())
    }
}
