//! Deterministic output naming.
//!
//! Identifiers are zero-padded to three digits so that lexicographic order
//! of the produced filenames equals numeric scene/sub order. The stitch
//! pass relies on this when it sorts discovered clips.

/// Name of the finished deliverable.
pub const FINAL_FILENAME: &str = "final_video.mp4";

/// Glob matching every sub-unit clip in an output directory.
pub const SUBUNIT_CLIP_GLOB: &str = "scene*_sub*_av.mp4";

/// Filename for a finished sub-unit clip.
pub fn subunit_clip_filename(scene_id: u32, sub_id: u32) -> String {
    format!("scene{scene_id:03}_sub{sub_id:03}_av.mp4")
}

/// Filename for a concatenated scene clip.
pub fn scene_clip_filename(scene_id: u32) -> String {
    format!("scene_{scene_id:03}.mp4")
}
