//! Voice-over rendering through the ElevenLabs text-to-speech API.
//!
//! Scripts may carry `[PAUSE:Ns]` markers in spoken lines; they are rewritten
//! to SSML break tags before the request so the voice actually pauses.

use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use regex::Regex;
use tokio::io::AsyncWriteExt;

use spotcut_assembly::SpeechSynthesizer;
use spotcut_common::{SpeechConfig, SpotcutError, SpotcutResult};

/// Renders spoken lines through the hosted voice model.
#[derive(Debug)]
pub struct VoiceSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    voice_id: String,
    model_id: String,
    output_format: String,
    speed: f32,
    stability: f32,
    similarity_boost: f32,
    pause_pattern: Regex,
}

impl VoiceSynthesizer {
    /// Build a synthesizer from the speech section of the config. Fails when
    /// no API key or voice is configured.
    pub fn from_config(config: &SpeechConfig) -> SpotcutResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            SpotcutError::speech("no ElevenLabs API key configured (set ELEVENLABS_API_KEY)")
        })?;
        let voice_id = config
            .voice_id
            .clone()
            .ok_or_else(|| SpotcutError::speech("no voice configured (set ELEVEN_VOICE_ID)"))?;
        let pause_pattern = Regex::new(r"\[PAUSE:(\d+)s\]")
            .map_err(|e| SpotcutError::speech(format!("invalid pause pattern: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            voice_id,
            model_id: config.model_id.clone(),
            output_format: config.output_format.clone(),
            speed: config.speed,
            stability: config.stability,
            similarity_boost: config.similarity_boost,
            pause_pattern,
        })
    }

    /// Rewrite `[PAUSE:Ns]` markers into SSML break tags.
    fn rewrite_pause_markers(&self, line: &str) -> String {
        self.pause_pattern
            .replace_all(line, r#"<break time="${1}s" />"#)
            .into_owned()
    }
}

#[async_trait]
impl SpeechSynthesizer for VoiceSynthesizer {
    async fn render(&self, line: &str, dest: &Path) -> SpotcutResult<()> {
        let text = self.rewrite_pause_markers(line);
        let url = format!("{}/v1/text-to-speech/{}", self.endpoint, self.voice_id);
        tracing::debug!(voice = %self.voice_id, chars = text.len(), "Rendering voice-over");

        let body = serde_json::json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "speed": self.speed,
                "stability": self.stability,
                "similarity_boost": self.similarity_boost,
            },
        });

        let response = self
            .client
            .post(&url)
            .query(&[("output_format", self.output_format.as_str())])
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SpotcutError::speech(format!("text-to-speech request: {e}")))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| SpotcutError::speech(format!("cannot create {}: {e}", dest.display())))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| SpotcutError::speech(format!("audio stream: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| SpotcutError::speech(format!("write {}: {e}", dest.display())))?;
        }
        file.flush()
            .await
            .map_err(|e| SpotcutError::speech(format!("flush {}: {e}", dest.display())))?;

        Ok(())
    }
}
