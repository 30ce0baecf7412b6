//! The externally observed output of a run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scene::Scene;

/// Everything a caller learns from a finished run: the deliverable path,
/// the enriched scene tree, and what was skipped along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The final concatenated video.
    pub final_video_path: PathBuf,

    /// All scenes with their terminal states and filled-in paths,
    /// in declared order.
    pub scenes: Vec<Scene>,

    /// Scenes and sub-units that did not make it into the deliverable.
    pub skipped: Vec<SkippedItem>,

    /// Non-fatal conditions observed during the run (duration drift,
    /// missing streams in verification).
    pub warnings: Vec<String>,

    /// When the run started (RFC 3339).
    pub started_at: String,

    /// Wall-clock run time.
    pub elapsed_secs: f64,
}

/// One skipped scene or sub-unit, with the reason it was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Scene the skip happened in.
    pub scene_id: u32,

    /// Skipped sub-unit, or `None` when the whole scene was skipped.
    pub sub_id: Option<u32>,

    /// Why it was skipped.
    pub reason: String,
}

impl PipelineResult {
    /// Number of scenes that made it into the deliverable.
    pub fn done_scene_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.is_done()).count()
    }

    /// Whether anything was skipped.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneState, SubUnit};

    #[test]
    fn test_result_counts_done_scenes() {
        let mut done = Scene::new(1, "", vec![SubUnit::new(1, "line", "a.mp4")]);
        done.clip_path = Some(PathBuf::from("scene_001.mp4"));
        done.state = SceneState::Done;

        let mut failed = Scene::new(2, "", vec![SubUnit::new(1, "line", "b.mp4")]);
        failed.state = SceneState::Failed;

        let result = PipelineResult {
            final_video_path: PathBuf::from("final_video.mp4"),
            scenes: vec![done, failed],
            skipped: vec![SkippedItem {
                scene_id: 2,
                sub_id: None,
                reason: "all sub-units failed".to_string(),
            }],
            warnings: vec![],
            started_at: "2025-01-01T00:00:00Z".to_string(),
            elapsed_secs: 12.5,
        };

        assert_eq!(result.done_scene_count(), 1);
        assert!(result.is_partial());
    }

    #[test]
    fn test_result_round_trips_through_json() {
        let result = PipelineResult {
            final_video_path: PathBuf::from("out/final_video.mp4"),
            scenes: vec![],
            skipped: vec![],
            warnings: vec!["final duration drift 0.7s exceeds 0.5s".to_string()],
            started_at: "2025-01-01T00:00:00Z".to_string(),
            elapsed_secs: 3.0,
        };
        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: PipelineResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.warnings.len(), 1);
        assert_eq!(back.final_video_path, result.final_video_path);
    }
}
