//! Input script types.
//!
//! A script is the tree a script provider hands over: ordered scenes, each
//! holding ordered sub-scenes that pair one spoken line with one visual
//! description. Loading validates the shape once, before any media work
//! starts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Ids are zero-padded to three digits in output filenames, so anything
/// wider would break lexicographic ordering.
pub const MAX_ID: u32 = 999;

/// Top-level script file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Ordered scenes. Output order is exactly this order.
    pub scenes: Vec<ScriptScene>,
}

/// One narrative beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptScene {
    /// Scene label, unique across the script.
    pub scene_id: u32,

    /// Caption text associated with the scene.
    #[serde(default)]
    pub on_screen_text: String,

    /// Ordered sub-scenes.
    pub sub_scenes: Vec<ScriptSubScene>,
}

/// Smallest creative segment: one spoken line over one source clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSubScene {
    /// Sub-scene label, unique within its scene.
    pub sub_id: u32,

    /// What the footage should show; the clip locator's query.
    pub visual_description: String,

    /// Voice-over text. May embed `[PAUSE:<seconds>s]` markers, which the
    /// speech synthesizer interprets.
    pub spoken_line: String,

    /// Pre-resolved media locator. When present, the clip locator is
    /// skipped for this sub-scene.
    #[serde(default)]
    pub source_url: Option<String>,
}

impl Script {
    /// Load and validate a script from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let script: Script =
            serde_json::from_str(&content).map_err(|e| ScriptError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        script.validate()?;
        Ok(script)
    }

    /// Check the structural rules a runnable script must satisfy.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.scenes.is_empty() {
            return Err(ScriptError::validation("script has no scenes"));
        }

        let mut scene_ids = HashSet::new();
        for scene in &self.scenes {
            if scene.scene_id > MAX_ID {
                return Err(ScriptError::validation(format!(
                    "scene id {} exceeds the maximum of {MAX_ID}",
                    scene.scene_id
                )));
            }
            if !scene_ids.insert(scene.scene_id) {
                return Err(ScriptError::validation(format!(
                    "duplicate scene id {}",
                    scene.scene_id
                )));
            }
            if scene.sub_scenes.is_empty() {
                return Err(ScriptError::validation(format!(
                    "scene {} has no sub-scenes",
                    scene.scene_id
                )));
            }

            let mut sub_ids = HashSet::new();
            for sub in &scene.sub_scenes {
                if sub.sub_id > MAX_ID {
                    return Err(ScriptError::validation(format!(
                        "sub id {} in scene {} exceeds the maximum of {MAX_ID}",
                        sub.sub_id, scene.scene_id
                    )));
                }
                if !sub_ids.insert(sub.sub_id) {
                    return Err(ScriptError::validation(format!(
                        "duplicate sub id {} in scene {}",
                        sub.sub_id, scene.scene_id
                    )));
                }
                if sub.spoken_line.trim().is_empty() {
                    return Err(ScriptError::validation(format!(
                        "empty spoken line in scene {} sub {}",
                        scene.scene_id, sub.sub_id
                    )));
                }
                if sub.visual_description.trim().is_empty() && sub.source_url.is_none() {
                    return Err(ScriptError::validation(format!(
                        "scene {} sub {} has neither a visual description nor a source url",
                        scene.scene_id, sub.sub_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of sub-scenes across all scenes.
    pub fn sub_unit_count(&self) -> usize {
        self.scenes.iter().map(|s| s.sub_scenes.len()).sum()
    }
}

/// Errors that can occur when loading scripts.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid script: {message}")]
    ValidationError { message: String },
}

impl ScriptError {
    fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(sub_id: u32) -> ScriptSubScene {
        ScriptSubScene {
            sub_id,
            visual_description: "a water bottle on a desk".to_string(),
            spoken_line: "Stay hydrated.".to_string(),
            source_url: None,
        }
    }

    fn scene(scene_id: u32, subs: Vec<ScriptSubScene>) -> ScriptScene {
        ScriptScene {
            scene_id,
            on_screen_text: String::new(),
            sub_scenes: subs,
        }
    }

    #[test]
    fn test_valid_script_passes() {
        let script = Script {
            scenes: vec![scene(1, vec![sub(1), sub(2)]), scene(2, vec![sub(1)])],
        };
        assert!(script.validate().is_ok());
        assert_eq!(script.sub_unit_count(), 3);
    }

    #[test]
    fn test_empty_script_rejected() {
        let script = Script { scenes: vec![] };
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_duplicate_scene_id_rejected() {
        let script = Script {
            scenes: vec![scene(1, vec![sub(1)]), scene(1, vec![sub(1)])],
        };
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate scene id 1"));
    }

    #[test]
    fn test_duplicate_sub_id_rejected() {
        let script = Script {
            scenes: vec![scene(1, vec![sub(3), sub(3)])],
        };
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate sub id 3"));
    }

    #[test]
    fn test_scene_without_subs_rejected() {
        let script = Script {
            scenes: vec![scene(4, vec![])],
        };
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_empty_spoken_line_rejected() {
        let mut bad = sub(1);
        bad.spoken_line = "   ".to_string();
        let script = Script {
            scenes: vec![scene(1, vec![bad])],
        };
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_missing_visual_and_url_rejected() {
        let mut bad = sub(1);
        bad.visual_description = String::new();
        let script = Script {
            scenes: vec![scene(1, vec![bad])],
        };
        assert!(script.validate().is_err());

        bad = sub(1);
        bad.visual_description = String::new();
        bad.source_url = Some("https://example.com/clip.mp4".to_string());
        let script = Script {
            scenes: vec![scene(1, vec![bad])],
        };
        assert!(script.validate().is_ok());
    }

    #[test]
    fn test_oversized_id_rejected() {
        let script = Script {
            scenes: vec![scene(1000, vec![sub(1)])],
        };
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_script_deserialization_defaults() {
        let json = r#"{
            "scenes": [
                {
                    "scene_id": 1,
                    "sub_scenes": [
                        {
                            "sub_id": 1,
                            "visual_description": "sunrise over a city",
                            "spoken_line": "Every morning starts somewhere."
                        }
                    ]
                }
            ]
        }"#;
        let script: Script = serde_json::from_str(json).unwrap();
        assert_eq!(script.scenes[0].on_screen_text, "");
        assert!(script.scenes[0].sub_scenes[0].source_url.is_none());
        assert!(script.validate().is_ok());
    }
}
