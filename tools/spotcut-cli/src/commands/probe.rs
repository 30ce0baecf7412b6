//! Show duration and stream layout of a media file.

use std::path::PathBuf;
use std::sync::Arc;

use spotcut_media_engine::{command_exists, Prober, SystemRunner, FFPROBE};

pub async fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    if !command_exists(FFPROBE) {
        return Err(anyhow::anyhow!("{FFPROBE} not found on PATH"));
    }

    let prober = Prober::new(Arc::new(SystemRunner::new()));
    let info = prober.inspect(&path).await?;

    if json {
        let doc = serde_json::json!({
            "path": path,
            "duration_secs": info.duration_secs,
            "has_video": info.has_video,
            "has_audio": info.has_audio,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("Media info: {}", path.display());
    println!("  Duration: {:.3}s", info.duration_secs);
    println!("  Video stream: {}", if info.has_video { "yes" } else { "no" });
    println!("  Audio stream: {}", if info.has_audio { "yes" } else { "no" });

    Ok(())
}
