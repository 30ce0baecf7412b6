//! Standalone stitch pass over previously produced sub-unit clips.
//!
//! Recovers a final video from a directory of `sceneNNN_subNNN_av.mp4`
//! files without re-running sourcing. Lexicographic order of the zero-padded
//! names is exactly assembly order, so a plain sort restores it.

use std::path::{Path, PathBuf};

use spotcut_common::{SpotcutError, SpotcutResult};
use spotcut_media_engine::{ConcatReport, Concatenator};

use crate::naming::SUBUNIT_CLIP_GLOB;

pub struct Stitcher {
    concatenator: Concatenator,
}

impl Stitcher {
    pub fn new(concatenator: Concatenator) -> Self {
        Self { concatenator }
    }

    /// Sub-unit clips under `dir`, in assembly order.
    pub fn discover(dir: &Path) -> SpotcutResult<Vec<PathBuf>> {
        let pattern = dir.join(SUBUNIT_CLIP_GLOB);
        let pattern = pattern.to_str().ok_or_else(|| {
            SpotcutError::assembly(format!("non-UTF-8 clip directory: {}", dir.display()))
        })?;

        let mut clips: Vec<PathBuf> = glob::glob(pattern)
            .map_err(|e| SpotcutError::assembly(format!("bad clip pattern {pattern:?}: {e}")))?
            .flatten()
            .collect();
        clips.sort();
        Ok(clips)
    }

    /// Join every discovered clip into `output`.
    pub async fn stitch(&self, dir: &Path, output: &Path) -> SpotcutResult<ConcatReport> {
        let clips = Self::discover(dir)?;
        if clips.is_empty() {
            return Err(SpotcutError::assembly(format!(
                "no sub-unit clips found in {}",
                dir.display()
            )));
        }

        tracing::info!(
            clips = clips.len(),
            dir = %dir.display(),
            output = %output.display(),
            "Stitching recovered clips"
        );
        self.concatenator.concatenate(&clips, output, true).await
    }
}
