//! End-to-end pipeline: resolve sources, assemble scenes concurrently, join
//! the survivors, and report what was skipped.

use std::sync::Arc;

use spotcut_common::{SpotcutError, SpotcutResult};
use spotcut_script_model::{PipelineResult, Scene, Script, ScriptSubScene, SkippedItem, SubUnit};

use crate::context::AssemblerContext;
use crate::finalize::FinalAssembler;
use crate::scene::{SceneAssembler, ScenePolicy};

/// Runs a whole script through assembly.
pub struct Pipeline {
    ctx: Arc<AssemblerContext>,
    policy: ScenePolicy,
}

impl Pipeline {
    pub fn new(ctx: AssemblerContext, policy: ScenePolicy) -> Self {
        Self {
            ctx: Arc::new(ctx),
            policy,
        }
    }

    /// Assemble `script` into a final video, returning the run manifest.
    pub async fn run(&self, script: &Script) -> SpotcutResult<PipelineResult> {
        let started = chrono::Utc::now();
        tracing::info!(
            scenes = script.scenes.len(),
            sub_units = script.sub_unit_count(),
            output_dir = %self.ctx.clips_dir.display(),
            "Starting pipeline"
        );

        tokio::fs::create_dir_all(&self.ctx.clips_dir)
            .await
            .map_err(|e| {
                SpotcutError::assembly(format!(
                    "cannot create output directory {}: {e}",
                    self.ctx.clips_dir.display()
                ))
            })?;

        let pending = self.resolve_scenes(script).await;

        let mut handles = Vec::with_capacity(pending.len());
        for scene in pending {
            let assembler = SceneAssembler::new(self.ctx.clone(), self.policy);
            handles.push(tokio::spawn(async move { assembler.assemble(scene).await }));
        }

        let mut scenes = Vec::with_capacity(handles.len());
        let mut warnings = Vec::new();
        let mut skipped = Vec::new();
        for handle in handles {
            let outcome = handle
                .await
                .map_err(|e| SpotcutError::assembly(format!("scene task failed: {e}")))?;
            warnings.extend(outcome.warnings);
            for sub in &outcome.scene.sub_units {
                if let Some(reason) = &sub.failure {
                    skipped.push(SkippedItem {
                        scene_id: outcome.scene.id,
                        sub_id: Some(sub.id),
                        reason: reason.clone(),
                    });
                }
            }
            if let Some(reason) = outcome.failure {
                skipped.push(SkippedItem {
                    scene_id: outcome.scene.id,
                    sub_id: None,
                    reason,
                });
            }
            scenes.push(outcome.scene);
        }

        let finalizer = FinalAssembler::new(self.ctx.clone());
        let (final_video_path, concat_warnings) = finalizer.assemble(&scenes).await?;
        warnings.extend(concat_warnings);

        let elapsed = chrono::Utc::now().signed_duration_since(started);
        let result = PipelineResult {
            final_video_path,
            scenes,
            skipped,
            warnings,
            started_at: started.to_rfc3339(),
            elapsed_secs: elapsed.num_milliseconds() as f64 / 1000.0,
        };
        tracing::info!(
            final_video = %result.final_video_path.display(),
            done_scenes = result.done_scene_count(),
            skipped = result.skipped.len(),
            elapsed_secs = result.elapsed_secs,
            "Pipeline finished"
        );
        Ok(result)
    }

    /// Build working scene records, resolving a source locator for every
    /// sub-unit the script does not pin to a URL or path.
    async fn resolve_scenes(&self, script: &Script) -> Vec<Scene> {
        let mut scenes = Vec::with_capacity(script.scenes.len());
        for scene in &script.scenes {
            let mut sub_units = Vec::with_capacity(scene.sub_scenes.len());
            for sub in &scene.sub_scenes {
                sub_units.push(self.resolve_sub_unit(scene.scene_id, sub).await);
            }
            scenes.push(Scene::new(
                scene.scene_id,
                scene.on_screen_text.clone(),
                sub_units,
            ));
        }
        scenes
    }

    async fn resolve_sub_unit(&self, scene_id: u32, sub: &ScriptSubScene) -> SubUnit {
        if let Some(url) = &sub.source_url {
            return SubUnit::new(sub.sub_id, &sub.spoken_line, url);
        }
        match self.ctx.locator.locate(&sub.visual_description).await {
            Ok(Some(locator)) => {
                tracing::debug!(scene_id, sub_id = sub.sub_id, locator = %locator, "Located footage");
                SubUnit::new(sub.sub_id, &sub.spoken_line, locator)
            }
            Ok(None) => {
                tracing::warn!(scene_id, sub_id = sub.sub_id, "No footage found");
                let mut unit = SubUnit::new(sub.sub_id, &sub.spoken_line, "");
                unit.fail(format!(
                    "no clip located for {:?}",
                    sub.visual_description
                ));
                unit
            }
            Err(e) => {
                tracing::warn!(scene_id, sub_id = sub.sub_id, error = %e, "Footage lookup failed");
                let mut unit = SubUnit::new(sub.sub_id, &sub.spoken_line, "");
                unit.fail(e.to_string());
                unit
            }
        }
    }
}
