//! Assemble a script into the final video.

use std::path::PathBuf;
use std::sync::Arc;

use spotcut_assembly::{AssemblerContext, Pipeline, ScenePolicy};
use spotcut_common::AppConfig;
use spotcut_media_engine::{command_exists, SystemRunner, FFMPEG, FFPROBE};
use spotcut_providers::{StockLocator, VoiceSynthesizer};
use spotcut_script_model::{PipelineResult, Script};

pub async fn run(
    script_path: PathBuf,
    output_dir: Option<PathBuf>,
    jobs: Option<usize>,
    strict: bool,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    for tool in [FFMPEG, FFPROBE] {
        if !command_exists(tool) {
            return Err(anyhow::anyhow!("{tool} not found on PATH"));
        }
    }

    let config = AppConfig::load();
    let script = Script::load(&script_path)
        .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;

    println!("Assembling script: {}", script_path.display());
    println!("  Scenes: {}", script.scenes.len());
    println!("  Sub-units: {}", script.sub_unit_count());

    let mut defaults = config.assembly.clone();
    if let Some(jobs) = jobs {
        defaults.transcode_jobs = Some(jobs);
    }
    if strict {
        defaults.strict_scenes = true;
    }
    let policy = if defaults.strict_scenes {
        ScenePolicy::Strict
    } else {
        ScenePolicy::Tolerant
    };

    let profile = super::profile_from(&defaults);
    profile
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid output profile: {e}"))?;

    let synthesizer = VoiceSynthesizer::from_config(&config.speech)?;
    let locator = StockLocator::from_config(&config.stock)?;

    let clips_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    println!("  Output: {}", clips_dir.display());
    tracing::debug!(
        width = profile.width,
        height = profile.height,
        strict = defaults.strict_scenes,
        "Assembly settings resolved"
    );

    let ctx = AssemblerContext::new(
        Arc::new(SystemRunner::new()),
        Arc::new(synthesizer),
        Arc::new(locator),
        profile,
        &defaults,
        clips_dir,
    );
    let result = Pipeline::new(ctx, policy).run(&script).await?;

    print_summary(&result);

    if let Some(report_path) = report {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&report_path, json)?;
        println!("  Report written: {}", report_path.display());
    }

    Ok(())
}

fn print_summary(result: &PipelineResult) {
    println!("\nAssembly complete: {}", result.final_video_path.display());
    println!(
        "  Scenes done: {}/{}",
        result.done_scene_count(),
        result.scenes.len()
    );
    println!("  Elapsed: {:.1}s", result.elapsed_secs);

    if !result.skipped.is_empty() {
        println!("\nSkipped:");
        for item in &result.skipped {
            match item.sub_id {
                Some(sub) => println!("  - scene {} sub {}: {}", item.scene_id, sub, item.reason),
                None => println!("  - scene {}: {}", item.scene_id, item.reason),
            }
        }
    }
    if !result.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }
}
