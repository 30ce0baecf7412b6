//! Footage search through the Shutterstock video API.
//!
//! Searches return many assets per entry; only the preview mp4 is usable
//! without a license purchase, so the locator picks the first entry that
//! carries one.

use async_trait::async_trait;
use serde::Deserialize;

use spotcut_assembly::ClipLocator;
use spotcut_common::{SpotcutError, SpotcutResult, StockConfig};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    assets: Option<EntryAssets>,
}

#[derive(Debug, Deserialize)]
struct EntryAssets {
    preview_mp4: Option<AssetFile>,
}

#[derive(Debug, Deserialize)]
struct AssetFile {
    url: String,
}

impl SearchResponse {
    /// URL of the first entry with a preview clip.
    fn first_preview_url(self) -> Option<String> {
        self.data
            .into_iter()
            .filter_map(|entry| entry.assets)
            .filter_map(|assets| assets.preview_mp4)
            .map(|file| file.url)
            .next()
    }
}

/// Finds stock footage matching a visual description.
#[derive(Debug)]
pub struct StockLocator {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    per_page: u32,
}

impl StockLocator {
    /// Build a locator from the stock section of the config. Fails when no
    /// API token is configured.
    pub fn from_config(config: &StockConfig) -> SpotcutResult<Self> {
        let token = config.token.clone().ok_or_else(|| {
            SpotcutError::locate("no Shutterstock token configured (set SHUTTERSTOCK_TOKEN)")
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token,
            per_page: config.per_page.max(1),
        })
    }
}

#[async_trait]
impl ClipLocator for StockLocator {
    async fn locate(&self, description: &str) -> SpotcutResult<Option<String>> {
        let url = format!("{}/v2/videos/search", self.endpoint);
        tracing::debug!(query = %description, "Searching stock footage");

        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", description),
                ("per_page", per_page.as_str()),
                ("view", "full"),
            ])
            .bearer_auth(&self.token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SpotcutError::locate(format!("video search: {e}")))?;

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SpotcutError::locate(format!("unparseable search response: {e}")))?;

        let found = parsed.first_preview_url();
        if found.is_none() {
            tracing::debug!(query = %description, "Search returned no usable preview");
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_preview_url_skips_entries_without_preview() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{
                "data": [
                    {"assets": null},
                    {"assets": {"preview_mp4": null}},
                    {"assets": {"preview_mp4": {"url": "https://cdn.example.com/a.mp4"}}},
                    {"assets": {"preview_mp4": {"url": "https://cdn.example.com/b.mp4"}}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            parsed.first_preview_url().as_deref(),
            Some("https://cdn.example.com/a.mp4")
        );
    }

    #[test]
    fn test_empty_search_response_is_none() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(parsed.first_preview_url(), None);

        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_preview_url(), None);
    }

    #[test]
    fn test_from_config_requires_token() {
        let mut config = StockConfig::default();
        let err = StockLocator::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("token"));

        config.token = Some("tok".to_string());
        assert!(StockLocator::from_config(&config).is_ok());
    }
}
