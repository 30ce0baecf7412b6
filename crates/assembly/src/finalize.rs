//! The final pass: joining finished scene clips into the deliverable.

use std::path::PathBuf;
use std::sync::Arc;

use spotcut_common::{SpotcutError, SpotcutResult};
use spotcut_script_model::Scene;

use crate::context::AssemblerContext;
use crate::naming::FINAL_FILENAME;

/// Joins finished scenes, in declared order, into the final video. Failed
/// scenes are excluded, never fatal here; only an empty surviving set is.
pub struct FinalAssembler {
    ctx: Arc<AssemblerContext>,
}

impl FinalAssembler {
    pub fn new(ctx: Arc<AssemblerContext>) -> Self {
        Self { ctx }
    }

    /// Returns the output path and any verification warnings.
    pub async fn assemble(&self, scenes: &[Scene]) -> SpotcutResult<(PathBuf, Vec<String>)> {
        let done: Vec<&Scene> = scenes.iter().filter(|s| s.is_done()).collect();

        if done.is_empty() {
            return Err(SpotcutError::assembly("no scenes produced clips"));
        }
        if done.len() < scenes.len() {
            tracing::warn!(
                done = done.len(),
                total = scenes.len(),
                "Assembling partial final video"
            );
        }

        let clips: Vec<PathBuf> = done.iter().filter_map(|s| s.clip_path.clone()).collect();
        let output = self.ctx.clips_dir.join(FINAL_FILENAME);
        let _permit = self
            .ctx
            .transcode_slots
            .acquire()
            .await
            .map_err(|e| SpotcutError::assembly(format!("transcode slot unavailable: {e}")))?;
        let report = self
            .ctx
            .concatenator
            .concatenate(&clips, &output, true)
            .await?;
        tracing::info!(
            output = %output.display(),
            scenes = clips.len(),
            "Final video assembled"
        );
        Ok((output, report.warnings))
    }
}
