//! Working records enriched while the pipeline runs.
//!
//! A [`SubUnit`] is created from a sub-scene once its source locator is
//! resolved; the speech render step fills the audio path and probed
//! duration, trim-and-mux fills the clip path. Immutable source fields
//! never change after creation. Each sub-unit is owned exclusively by its
//! parent [`Scene`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Stage a sub-unit is in. Audio rendering and video fetching overlap in
/// wall time; both must finish before trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubUnitState {
    Pending,
    RenderingAudio,
    FetchingVideo,
    Trimming,
    Ready,
    Failed,
}

/// Stage a scene is in. The sourcing states describe the aggregate phase
/// while sub-unit work is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneState {
    Pending,
    RenderingAudio,
    FetchingVideo,
    Trimming,
    SubclipsReady,
    Concatenating,
    Done,
    Failed,
}

/// One spoken line paired with one source clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubUnit {
    /// Sub-unit label, unique within its scene.
    pub id: u32,

    /// Voice-over text (pause markers included verbatim).
    pub spoken_line: String,

    /// Where the source footage comes from: a URL or a local path.
    pub source_locator: String,

    /// Rendered voice-over file, once synthesis succeeded.
    pub local_audio_path: Option<PathBuf>,

    /// Fetched raw footage, once the download succeeded.
    pub local_video_path: Option<PathBuf>,

    /// Probed duration of the rendered voice-over.
    pub audio_duration_secs: Option<f64>,

    /// Finished muxed clip. `Some` only if render and fetch+trim both
    /// succeeded.
    pub clip_path: Option<PathBuf>,

    /// Current stage.
    pub state: SubUnitState,

    /// Why the sub-unit failed, when it did.
    pub failure: Option<String>,
}

impl SubUnit {
    /// Create a pending sub-unit from its immutable source fields.
    pub fn new(id: u32, spoken_line: impl Into<String>, source_locator: impl Into<String>) -> Self {
        Self {
            id,
            spoken_line: spoken_line.into(),
            source_locator: source_locator.into(),
            local_audio_path: None,
            local_video_path: None,
            audio_duration_secs: None,
            clip_path: None,
            state: SubUnitState::Pending,
            failure: None,
        }
    }

    /// Mark the sub-unit failed with a reason. Keeps the first reason if
    /// called twice.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = SubUnitState::Failed;
        if self.failure.is_none() {
            self.failure = Some(reason.into());
        }
    }

    /// Whether the sub-unit produced a finished clip.
    pub fn is_ready(&self) -> bool {
        self.state == SubUnitState::Ready && self.clip_path.is_some()
    }
}

/// Ordered group of sub-units forming one narrative beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Scene label, unique across the run.
    pub id: u32,

    /// Caption text associated with the scene.
    pub on_screen_text: String,

    /// Ordered sub-units. Concatenation order is exactly this order.
    pub sub_units: Vec<SubUnit>,

    /// Concatenated scene clip, once all sub-units are terminal and the
    /// concat succeeded.
    pub clip_path: Option<PathBuf>,

    /// Current stage.
    pub state: SceneState,
}

impl Scene {
    /// Create a pending scene owning its sub-units.
    pub fn new(id: u32, on_screen_text: impl Into<String>, sub_units: Vec<SubUnit>) -> Self {
        Self {
            id,
            on_screen_text: on_screen_text.into(),
            sub_units,
            clip_path: None,
            state: SceneState::Pending,
        }
    }

    /// Clip paths of the sub-units that finished, in declared order.
    pub fn surviving_clips(&self) -> Vec<&Path> {
        self.sub_units
            .iter()
            .filter(|s| s.is_ready())
            .filter_map(|s| s.clip_path.as_deref())
            .collect()
    }

    /// Whether the scene holds a finished clip.
    pub fn is_done(&self) -> bool {
        self.state == SceneState::Done && self.clip_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sub_unit_is_pending() {
        let sub = SubUnit::new(1, "Say this.", "https://example.com/a.mp4");
        assert_eq!(sub.state, SubUnitState::Pending);
        assert!(sub.clip_path.is_none());
        assert!(!sub.is_ready());
    }

    #[test]
    fn test_fail_keeps_first_reason() {
        let mut sub = SubUnit::new(1, "Say this.", "clip.mp4");
        sub.fail("fetch failed");
        sub.fail("later failure");
        assert_eq!(sub.state, SubUnitState::Failed);
        assert_eq!(sub.failure.as_deref(), Some("fetch failed"));
    }

    #[test]
    fn test_surviving_clips_preserve_order_and_skip_failures() {
        let mut a = SubUnit::new(1, "one", "a.mp4");
        a.clip_path = Some(PathBuf::from("scene001_sub001_av.mp4"));
        a.state = SubUnitState::Ready;

        let mut b = SubUnit::new(2, "two", "b.mp4");
        b.fail("no clip located");

        let mut c = SubUnit::new(3, "three", "c.mp4");
        c.clip_path = Some(PathBuf::from("scene001_sub003_av.mp4"));
        c.state = SubUnitState::Ready;

        let scene = Scene::new(1, "", vec![a, b, c]);
        let clips = scene.surviving_clips();
        assert_eq!(clips.len(), 2);
        assert!(clips[0].ends_with("scene001_sub001_av.mp4"));
        assert!(clips[1].ends_with("scene001_sub003_av.mp4"));
    }

    #[test]
    fn test_state_serialization_is_snake_case() {
        let json = serde_json::to_string(&SceneState::SubclipsReady).unwrap();
        assert_eq!(json, "\"subclips_ready\"");
        let back: SceneState = serde_json::from_str("\"rendering_audio\"").unwrap();
        assert_eq!(back, SceneState::RenderingAudio);
    }
}
