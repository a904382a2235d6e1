//! Translation chains
//!
//! Two ways of pushing a text through machine translation and back:
//!
//! - **Round trip** (shallow mode): source → one pivot language → home
//!   language. Failures are returned to the caller.
//! - **Shatter** (deep mode): source → Arabic (VSO) → Korean (SOV) → home
//!   language. Word order is rebuilt twice by grammars that disagree with
//!   English, which reshuffles sentence structure. Failures anywhere in the
//!   chain fall back to the text as it was before the chain.
//!
//! Every hop runs under a timeout; an elapsed timeout is reported as
//! [`MtError::Timeout`] and handled like any other translation failure.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{MtError, MtResult};
use crate::translator::{AUTO_DETECT, MachineTranslator};

/// Deep-mode hops after source detection: VSO, then SOV
pub const SHATTER_PIVOTS: [&str; 2] = ["ar", "ko"];

/// Language the chains return to unless configured otherwise
pub const DEFAULT_HOME_LANGUAGE: &str = "en";

/// Runs multi-hop translations against a shared provider
#[derive(Clone)]
pub struct TranslationChain {
    translator: Arc<dyn MachineTranslator>,
    timeout: Duration,
    home_language: String,
}

impl TranslationChain {
    pub fn new(translator: Arc<dyn MachineTranslator>, timeout: Duration) -> Self {
        Self {
            translator,
            timeout,
            home_language: DEFAULT_HOME_LANGUAGE.to_string(),
        }
    }

    /// Change the language chains translate back into
    pub fn with_home_language(mut self, language: impl Into<String>) -> Self {
        self.home_language = language.into();
        self
    }

    pub fn home_language(&self) -> &str {
        &self.home_language
    }

    pub fn provider_name(&self) -> &str {
        self.translator.provider_name()
    }

    /// One translation call bounded by the chain's timeout
    async fn hop(&self, text: &str, source: &str, target: &str) -> MtResult<String> {
        tracing::debug!(
            provider = self.translator.provider_name(),
            source,
            target,
            "translation hop"
        );
        match tokio::time::timeout(self.timeout, self.translator.translate(text, source, target))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(MtError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Translate through `via` and back to the home language
    pub async fn round_trip(&self, text: &str, via: &str) -> MtResult<String> {
        let pivoted = self.hop(text, AUTO_DETECT, via).await?;
        self.hop(&pivoted, via, &self.home_language).await
    }

    /// Run the full shatter chain, reporting the first failure
    pub async fn try_shatter(&self, text: &str) -> MtResult<String> {
        let mut current = text.to_string();
        let mut source = AUTO_DETECT;
        for pivot in SHATTER_PIVOTS {
            current = self.hop(&current, source, pivot).await?;
            source = pivot;
        }
        self.hop(&current, source, &self.home_language).await
    }

    /// Run the shatter chain; on any failure return `text` unchanged
    pub async fn shatter(&self, text: &str) -> String {
        match self.try_shatter(text).await {
            Ok(shattered) => shattered,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    provider = self.translator.provider_name(),
                    "translation chain failed, keeping pre-chain text"
                );
                text.to_string()
            }
        }
    }
}

impl std::fmt::Debug for TranslationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationChain")
            .field("provider", &self.translator.provider_name())
            .field("timeout", &self.timeout)
            .field("home_language", &self.home_language)
            .finish()
    }
}
