//! Google Translate API provider for machine translation
//!
//! This module integrates with Google Translate API v2.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GOOGLE_TRANSLATE_API_KEY`
//! environment variable. Obtain a key from:
//! https://console.cloud.google.com/
//!
//! # Source detection
//!
//! Passing [`AUTO_DETECT`](crate::translator::AUTO_DETECT) as the source
//! language leaves `source` out of the request body, which makes the API
//! detect the language itself.
//!
//! # Example
//!
//! ```ignore
//! use humanize_mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("Hello, world!", "auto", "ko").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use crate::error::{MtError, MtResult};
use crate::translator::{MachineTranslator, is_auto_detect, normalize_locale, validate_locale};
use async_trait::async_trait;
use serde_json::json;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate API v2 provider
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum number of texts per API request
    const MAX_BATCH_SIZE: usize = 128;

    /// Maximum characters per string
    pub const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Default HTTP timeout for a single request
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new provider with an explicit API key
    ///
    /// # Returns
    ///
    /// * `Err(MtError::ConfigError)` - If the API key is blank
    /// * `Err(MtError::NetworkError)` - If the HTTP client cannot be built
    pub fn new(api_key: String) -> MtResult<Self> {
        Self::with_timeout(api_key, Self::DEFAULT_TIMEOUT)
    }

    /// Create a provider whose HTTP client gives up after `timeout`
    pub fn with_timeout(api_key: String, timeout: Duration) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", API_KEY_ENV))
        })?;

        Self::new(api_key)
    }

    /// Point the provider at a different endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chunk_batch(texts: &[String]) -> Vec<&[String]> {
        texts.chunks(Self::MAX_BATCH_SIZE).collect()
    }

    /// Request body for one chunk; `source` is omitted for auto-detection
    fn request_body(
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> serde_json::Value {
        let mut body = json!({
            "q": texts,
            "target": normalize_locale(target_locale),
            "format": "text"
        });
        if !is_auto_detect(source_locale) {
            body["source"] = json!(normalize_locale(source_locale));
        }
        body
    }

    fn check_length(text: &str) -> MtResult<()> {
        if text.chars().count() > Self::MAX_CHARS_PER_STRING {
            return Err(MtError::TranslationError(format!(
                "Text exceeds maximum length of {} characters",
                Self::MAX_CHARS_PER_STRING
            )));
        }
        Ok(())
    }

    /// Translate a single chunk of texts via the API
    async fn translate_chunk(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        let url = format!("{}?key={}", self.base_url, self.api_key);
        let body = Self::request_body(texts, source_locale, target_locale);

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!("API server error ({}): {}", status, error_text))
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        let results = parse_translations(&json)?;
        if results.len() != texts.len() {
            return Err(MtError::TranslationError(format!(
                "API returned {} translations for {} texts",
                results.len(),
                texts.len()
            )));
        }
        Ok(results)
    }
}

/// Extract `data.translations[*].translatedText` from a v2 response
fn parse_translations(json: &serde_json::Value) -> MtResult<Vec<String>> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        MtError::TranslationError(
            "Invalid API response: missing 'data.translations' array".to_string(),
        )
    })?;

    translations
        .iter()
        .map(|t| {
            t["translatedText"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    MtError::TranslationError(
                        "Invalid API response: missing 'translatedText' field".to_string(),
                    )
                })
        })
        .collect()
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }
        Self::check_length(text)?;

        let results = self
            .translate_chunk(&[text.to_string()], source_locale, target_locale)
            .await?;

        Ok(results.into_iter().next().unwrap_or_default())
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            Self::check_length(text)?;
        }

        let mut all_results = Vec::with_capacity(texts.len());
        for chunk in Self::chunk_batch(texts) {
            let chunk_results = self
                .translate_chunk(chunk, source_locale, target_locale)
                .await?;
            all_results.extend(chunk_results);
        }

        Ok(all_results)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
