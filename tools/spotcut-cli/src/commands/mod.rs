pub mod assemble;
pub mod check;
pub mod probe;
pub mod stitch;
pub mod validate;

use spotcut_common::AssemblyDefaults;
use spotcut_script_model::CanonicalProfile;

/// Output profile from the configured assembly defaults.
pub(crate) fn profile_from(defaults: &AssemblyDefaults) -> CanonicalProfile {
    CanonicalProfile {
        width: defaults.width,
        height: defaults.height,
        frame_rate: defaults.frame_rate,
        video_bitrate_kbps: defaults.video_bitrate_kbps,
        pixel_format: defaults.pixel_format.clone(),
        keyframe_interval: defaults.frame_rate,
        audio_bitrate_kbps: defaults.audio_bitrate_kbps,
    }
}
