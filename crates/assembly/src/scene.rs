//! Per-scene assembly.
//!
//! Sub-units are sourced concurrently: every footage fetch starts as a
//! background task before the voice-over renders are awaited, so downloads
//! overlap synthesis. Trims take one transcode slot each, as does the scene
//! concat. One failed sub-unit never aborts its siblings; the scene fails
//! only when every sub-unit failed or its own concat did.
//!
//! Raw footage and voice-over files live in a scene-scoped temp directory
//! that is removed when assembly finishes, whatever the outcome. Finished
//! sub-unit clips land in the shared clips directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spotcut_common::SpotcutError;
use spotcut_script_model::{Scene, SceneState, SubUnitState};

use crate::context::AssemblerContext;
use crate::naming::{scene_clip_filename, subunit_clip_filename};

/// How a scene treats partial sub-unit failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePolicy {
    /// A scene with at least one surviving sub-unit proceeds and counts
    /// as done; skipped sub-units go in the manifest.
    #[default]
    Tolerant,

    /// Any failed sub-unit fails its whole scene.
    Strict,
}

/// A terminal scene plus findings that belong in the run manifest.
#[derive(Debug)]
pub struct SceneOutcome {
    pub scene: Scene,

    /// Verification warnings from the scene concat, if any.
    pub warnings: Vec<String>,

    /// Why the scene failed, when it did.
    pub failure: Option<String>,
}

/// Paths one sub-unit works with, fixed before any work starts. `None` for
/// sub-units that already failed during source resolution.
struct WorkPaths {
    audio: PathBuf,
    raw: PathBuf,
    clip: PathBuf,
}

/// Drives one scene to a terminal state.
pub struct SceneAssembler {
    ctx: Arc<AssemblerContext>,
    policy: ScenePolicy,
}

impl SceneAssembler {
    pub fn new(ctx: Arc<AssemblerContext>, policy: ScenePolicy) -> Self {
        Self { ctx, policy }
    }

    pub async fn assemble(&self, mut scene: Scene) -> SceneOutcome {
        tracing::info!(
            scene_id = scene.id,
            sub_units = scene.sub_units.len(),
            "Assembling scene"
        );

        let workdir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                scene.state = SceneState::Failed;
                return SceneOutcome {
                    scene,
                    warnings: Vec::new(),
                    failure: Some(format!("cannot create scene workdir: {e}")),
                };
            }
        };

        let paths = self.work_paths(&scene, workdir.path());
        self.source_sub_units(&mut scene, &paths).await;
        self.trim_sub_units(&mut scene, &paths).await;

        let survivors: Vec<PathBuf> = scene
            .surviving_clips()
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        if survivors.is_empty() {
            scene.state = SceneState::Failed;
            tracing::warn!(scene_id = scene.id, "No sub-unit produced a clip");
            return SceneOutcome {
                scene,
                warnings: Vec::new(),
                failure: Some("no sub-unit produced a clip".to_string()),
            };
        }
        if survivors.len() < scene.sub_units.len() {
            let failed = scene.sub_units.len() - survivors.len();
            let total = scene.sub_units.len();
            if self.policy == ScenePolicy::Strict {
                scene.state = SceneState::Failed;
                tracing::warn!(
                    scene_id = scene.id,
                    failed,
                    "Failing partial scene under the strict policy"
                );
                return SceneOutcome {
                    scene,
                    warnings: Vec::new(),
                    failure: Some(format!(
                        "{failed} of {total} sub-units failed and the scene policy is strict"
                    )),
                };
            }
            tracing::warn!(
                scene_id = scene.id,
                ready = survivors.len(),
                total,
                "Proceeding with partial scene"
            );
        }
        scene.state = SceneState::SubclipsReady;

        let _permit = match self.ctx.transcode_slots.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                scene.state = SceneState::Failed;
                return SceneOutcome {
                    scene,
                    warnings: Vec::new(),
                    failure: Some(format!("transcode slot unavailable: {e}")),
                };
            }
        };
        scene.state = SceneState::Concatenating;
        let clip_path = self.ctx.clips_dir.join(scene_clip_filename(scene.id));
        match self
            .ctx
            .concatenator
            .concatenate(&survivors, &clip_path, true)
            .await
        {
            Ok(report) => {
                scene.clip_path = Some(clip_path);
                scene.state = SceneState::Done;
                tracing::info!(scene_id = scene.id, clip = %report.output.display(), "Scene done");
                let scene_id = scene.id;
                SceneOutcome {
                    scene,
                    warnings: report
                        .warnings
                        .into_iter()
                        .map(|w| format!("scene {scene_id}: {w}"))
                        .collect(),
                    failure: None,
                }
            }
            Err(e) => {
                scene.state = SceneState::Failed;
                tracing::warn!(scene_id = scene.id, error = %e, "Scene concat failed");
                SceneOutcome {
                    scene,
                    warnings: Vec::new(),
                    failure: Some(e.to_string()),
                }
            }
        }
    }

    fn work_paths(&self, scene: &Scene, workdir: &Path) -> Vec<Option<WorkPaths>> {
        scene
            .sub_units
            .iter()
            .map(|sub| {
                if sub.state == SubUnitState::Failed {
                    return None;
                }
                let stem = format!("scene{:03}_sub{:03}", scene.id, sub.id);
                Some(WorkPaths {
                    audio: workdir.join(format!("{stem}_voice.mp3")),
                    raw: workdir.join(format!("{stem}_raw.mp4")),
                    clip: self
                        .ctx
                        .clips_dir
                        .join(subunit_clip_filename(scene.id, sub.id)),
                })
            })
            .collect()
    }

    /// Render voice-overs and fetch raw footage for every pending sub-unit.
    /// Fetches run as background tasks so downloads overlap synthesis; both
    /// results are always collected, even when the other side failed first.
    async fn source_sub_units(&self, scene: &mut Scene, paths: &[Option<WorkPaths>]) {
        scene.state = SceneState::RenderingAudio;

        let mut fetch_handles = Vec::with_capacity(scene.sub_units.len());
        for (sub, work) in scene.sub_units.iter_mut().zip(paths) {
            let Some(work) = work else {
                fetch_handles.push(None);
                continue;
            };
            sub.state = SubUnitState::RenderingAudio;
            let fetcher = self.ctx.fetcher.clone();
            let slots = self.ctx.fetch_slots.clone();
            let locator = sub.source_locator.clone();
            let raw = work.raw.clone();
            fetch_handles.push(Some(tokio::spawn(async move {
                let _permit = slots
                    .acquire_owned()
                    .await
                    .map_err(|e| SpotcutError::fetch(format!("fetch slot unavailable: {e}")))?;
                fetcher.fetch(&locator, &raw).await
            })));
        }

        let renders = futures_util::future::join_all(scene.sub_units.iter().zip(paths).map(
            |(sub, work)| {
                let synthesizer = self.ctx.synthesizer.clone();
                async move {
                    match work {
                        Some(work) if sub.state == SubUnitState::RenderingAudio => {
                            Some(synthesizer.render(&sub.spoken_line, &work.audio).await)
                        }
                        _ => None,
                    }
                }
            },
        ))
        .await;

        for ((sub, work), render) in scene.sub_units.iter_mut().zip(paths).zip(renders) {
            let (Some(work), Some(render)) = (work, render) else {
                continue;
            };
            match render {
                Ok(()) => sub.local_audio_path = Some(work.audio.clone()),
                Err(e) => {
                    tracing::warn!(sub_id = sub.id, error = %e, "Voice-over render failed");
                    sub.fail(e.to_string());
                }
            }
        }

        scene.state = SceneState::FetchingVideo;
        for ((sub, work), handle) in scene.sub_units.iter_mut().zip(paths).zip(fetch_handles) {
            let (Some(work), Some(handle)) = (work, handle) else {
                continue;
            };
            if sub.state != SubUnitState::Failed {
                sub.state = SubUnitState::FetchingVideo;
            }
            let fetched = match handle.await {
                Ok(result) => result,
                Err(e) => Err(SpotcutError::fetch(format!("fetch task failed: {e}"))),
            };
            match fetched {
                Ok(()) => sub.local_video_path = Some(work.raw.clone()),
                Err(e) => {
                    tracing::warn!(sub_id = sub.id, error = %e, "Footage fetch failed");
                    sub.fail(e.to_string());
                }
            }
        }
    }

    /// Trim fetched footage to voice-over length, one transcode slot each.
    async fn trim_sub_units(&self, scene: &mut Scene, paths: &[Option<WorkPaths>]) {
        scene.state = SceneState::Trimming;

        let mut jobs = Vec::new();
        for (i, (sub, work)) in scene.sub_units.iter_mut().zip(paths).enumerate() {
            let Some(work) = work else {
                continue;
            };
            if sub.state == SubUnitState::Failed {
                continue;
            }
            sub.state = SubUnitState::Trimming;
            let muxer = self.ctx.trim_muxer.clone();
            let slots = self.ctx.transcode_slots.clone();
            let raw = work.raw.clone();
            let audio = work.audio.clone();
            let clip = work.clip.clone();
            jobs.push(async move {
                let result = async {
                    let _permit = slots.acquire_owned().await.map_err(|e| {
                        SpotcutError::mux(format!("transcode slot unavailable: {e}"))
                    })?;
                    muxer.process(&raw, &audio, &clip).await
                }
                .await;
                (i, clip, result)
            });
        }

        for (i, clip, result) in futures_util::future::join_all(jobs).await {
            let sub = &mut scene.sub_units[i];
            match result {
                Ok(duration) => {
                    sub.audio_duration_secs = Some(duration);
                    sub.clip_path = Some(clip);
                    sub.state = SubUnitState::Ready;
                }
                Err(e) => {
                    tracing::warn!(sub_id = sub.id, error = %e, "Trim and mux failed");
                    sub.fail(e.to_string());
                }
            }
        }
    }
}
