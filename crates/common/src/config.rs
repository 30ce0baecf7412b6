//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where assembled runs are written.
    pub output_dir: PathBuf,

    /// Default assembly parameters.
    pub assembly: AssemblyDefaults,

    /// Speech synthesizer credentials and voice settings.
    pub speech: SpeechConfig,

    /// Stock footage search credentials.
    pub stock: StockConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default parameters for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyDefaults {
    /// Canonical output width.
    pub width: u32,

    /// Canonical output height.
    pub height: u32,

    /// Canonical output frame rate.
    pub frame_rate: u32,

    /// Video bitrate ceiling in kbps (target == max).
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,

    /// Canonical pixel format.
    pub pixel_format: String,

    /// Concurrent transcode slots. `None` means one per logical core.
    pub transcode_jobs: Option<usize>,

    /// Concurrent download slots.
    pub fetch_jobs: usize,

    /// Allowed drift between expected and measured durations, seconds.
    pub duration_tolerance_secs: f64,

    /// Fail a whole scene when any of its sub-units fails.
    pub strict_scenes: bool,
}

/// Speech synthesizer settings. The API key and voice id resolve from
/// `ELEVENLABS_API_KEY` / `ELEVEN_VOICE_ID` over config-file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// API base URL.
    pub endpoint: String,

    /// API key. Not usually stored in the config file.
    pub api_key: Option<String>,

    /// Voice to synthesize with.
    pub voice_id: Option<String>,

    /// Synthesis model.
    pub model_id: String,

    /// Encoded output format requested from the service.
    pub output_format: String,

    /// Speaking speed multiplier.
    pub speed: f32,

    /// Voice stability, 0..1.
    pub stability: f32,

    /// Voice similarity boost, 0..1.
    pub similarity_boost: f32,
}

/// Stock footage search settings. The token resolves from
/// `SHUTTERSTOCK_TOKEN` over the config-file value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// API base URL.
    pub endpoint: String,

    /// Bearer token. Not usually stored in the config file.
    pub token: Option<String>,

    /// Results requested per search.
    pub per_page: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "spotcut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: dirs_default_output(),
            assembly: AssemblyDefaults::default(),
            speech: SpeechConfig::default(),
            stock: StockConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AssemblyDefaults {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frame_rate: 30,
            video_bitrate_kbps: 5000,
            audio_bitrate_kbps: 192,
            pixel_format: "yuv420p".to_string(),
            transcode_jobs: None,
            fetch_jobs: 4,
            duration_tolerance_secs: 0.5,
            strict_scenes: false,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.elevenlabs.io".to_string(),
            api_key: None,
            voice_id: None,
            model_id: "eleven_multilingual_v2".to_string(),
            output_format: "mp3_44100_128".to_string(),
            speed: 1.0,
            stability: 0.35,
            similarity_boost: 0.75,
        }
    }
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.shutterstock.com".to_string(),
            token: None,
            per_page: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    /// Credentials present in the environment override file values.
    pub fn load() -> Self {
        let config_path = config_file_path();
        let mut config = Self::default();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(parsed) => config = parsed,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        config.apply_env_overrides();
        config
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
            self.speech.api_key = Some(key);
        }
        if let Ok(voice) = std::env::var("ELEVEN_VOICE_ID") {
            self.speech.voice_id = Some(voice);
        }
        if let Ok(token) = std::env::var("SHUTTERSTOCK_TOKEN") {
            self.stock.token = Some(token);
        }
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("spotcut").join("config.json")
}

/// Default output directory.
fn dirs_default_output() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("spotcut").join("output")
}
