//! Stitch previously produced sub-unit clips into a final video.

use std::path::PathBuf;
use std::sync::Arc;

use spotcut_assembly::{Stitcher, FINAL_FILENAME};
use spotcut_common::AppConfig;
use spotcut_media_engine::{
    command_exists, Concatenator, Normalizer, Prober, SystemRunner, FFMPEG, FFPROBE,
};

pub async fn run(dir: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    for tool in [FFMPEG, FFPROBE] {
        if !command_exists(tool) {
            return Err(anyhow::anyhow!("{tool} not found on PATH"));
        }
    }

    let config = AppConfig::load();
    let profile = super::profile_from(&config.assembly);
    profile
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid output profile: {e}"))?;

    let runner = Arc::new(SystemRunner::new());
    let prober = Prober::new(runner.clone());
    let normalizer = Normalizer::new(runner.clone(), profile);
    let concatenator = Concatenator::new(
        runner,
        prober,
        normalizer,
        config.assembly.duration_tolerance_secs,
    );

    let output = output.unwrap_or_else(|| dir.join(FINAL_FILENAME));
    println!("Stitching clips in: {}", dir.display());

    let report = Stitcher::new(concatenator).stitch(&dir, &output).await?;

    println!("\nStitch complete: {}", report.output.display());
    println!("  Expected duration: {:.2}s", report.expected_secs);
    if let Some(measured) = report.measured_secs {
        println!("  Measured duration: {measured:.2}s");
    }
    for warning in &report.warnings {
        println!("  [WARN] {warning}");
    }

    Ok(())
}
