//! Check tools, configuration, and credentials.

use spotcut_common::{config_file_path, AppConfig};
use spotcut_media_engine::{command_exists, FFMPEG, FFPROBE};

pub fn run(write_default_config: bool) -> anyhow::Result<()> {
    println!("Spotcut System Check");
    println!("{}", "=".repeat(50));

    let mut tools_ok = true;
    for tool in [FFMPEG, FFPROBE] {
        if command_exists(tool) {
            println!("[OK] {tool} found on PATH");
        } else {
            println!("[MISSING] {tool} not found on PATH");
            tools_ok = false;
        }
    }

    let config_path = config_file_path();
    if write_default_config {
        AppConfig::default().save()?;
        println!("[OK] Default config written: {}", config_path.display());
    } else if config_path.exists() {
        println!("[OK] Config file: {}", config_path.display());
    } else {
        println!(
            "[WARN] No config file at {} (using defaults)",
            config_path.display()
        );
    }

    let config = AppConfig::load();
    match &config.speech.api_key {
        Some(_) => println!("[OK] ElevenLabs API key configured"),
        None => println!("[WARN] No ElevenLabs API key (set ELEVENLABS_API_KEY)"),
    }
    match &config.speech.voice_id {
        Some(voice) => println!("[OK] Voice configured: {voice}"),
        None => println!("[WARN] No voice configured (set ELEVEN_VOICE_ID)"),
    }
    match &config.stock.token {
        Some(_) => println!("[OK] Shutterstock token configured"),
        None => println!("[WARN] No Shutterstock token (set SHUTTERSTOCK_TOKEN)"),
    }
    println!("  Output directory: {}", config.output_dir.display());

    println!();
    if tools_ok {
        println!("Media tools are available. Spotcut is ready.");
    } else {
        println!("Install ffmpeg to use assemble, stitch, and probe.");
    }

    Ok(())
}
