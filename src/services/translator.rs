// src/services/translator.rs
// DOCUMENTATION: Query term translation
// PURPOSE: Translate the French query term to English before building payloads

use crate::errors::LeadError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";
const TRANSLATE_PATH: &str = "/translate_a/single";

/// Fixed language pair: the UI collects French terms, the Places category
/// vocabulary is English
const SOURCE_LANG: &str = "fr";
const TARGET_LANG: &str = "en";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Translation client
/// DOCUMENTATION: One blocking call per run, before any fan-out starts
#[derive(Debug, Clone)]
pub struct Translator {
    client: Client,
    base_url: String,
}

impl Translator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Point the translator at an alternate base URL (for tests)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Translate a query term from French to English, lowercased
    ///
    /// Uses the public gtx endpoint, whose response is a nested array:
    /// `[[["restaurant","restaurant",...]],...]` - the translated text sits
    /// at [0][0][0].
    pub async fn translate(&self, term: &str) -> Result<String, LeadError> {
        let url = format!("{}{}", self.base_url, TRANSLATE_PATH);

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("client", "gtx"),
                ("sl", SOURCE_LANG),
                ("tl", TARGET_LANG),
                ("dt", "t"),
                ("q", term),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Translation request failed: {}", e);
                LeadError::TranslationError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Translation API error: {}", status);
            return Err(LeadError::TranslationError(format!("API error {}", status)));
        }

        let payload: Value = response.json().await.map_err(|e| {
            log::error!("Failed to parse translation response: {}", e);
            LeadError::TranslationError(format!("Parse error: {}", e))
        })?;

        let translated = payload
            .get(0)
            .and_then(|v| v.get(0))
            .and_then(|v| v.get(0))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                log::error!("Unexpected translation payload shape: {}", payload);
                LeadError::TranslationError("Unexpected response shape".to_string())
            })?;

        let translated = translated.trim().to_lowercase();
        log::info!("Translated query term {:?} -> {:?}", term, translated);

        Ok(translated)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_translate_parses_gtx_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path(TRANSLATE_PATH)
                .query_param("sl", "fr")
                .query_param("tl", "en")
                .query_param("q", "Restaurant");
            then.status(200).json_body(serde_json::json!([
                [["Restaurant", "Restaurant", null, null, 10]],
                null,
                "fr"
            ]));
        });

        let translator = Translator::with_base_url(server.base_url());
        let translated = translator.translate("Restaurant").await.unwrap();

        // Result is lowercased for use as a Places category
        assert_eq!(translated, "restaurant");
    }

    #[tokio::test]
    async fn test_translate_unexpected_shape_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(TRANSLATE_PATH);
            then.status(200).json_body(serde_json::json!({"detail": "nope"}));
        });

        let translator = Translator::with_base_url(server.base_url());
        let result = translator.translate("hôtel").await;

        assert!(matches!(result, Err(LeadError::TranslationError(_))));
    }
}
