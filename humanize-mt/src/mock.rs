//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the translation
//! chains and the pipeline without API keys or network access. Every call is
//! recorded so tests can assert on the exact language hops taken.
//!
//! # Example
//!
//! ```ignore
//! use humanize_mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "auto", "fr").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append target suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings: (text, target_locale) → translation.
    /// Unknown pairs fall back to returning the input unchanged.
    Mappings(HashMap<(String, String), String>),

    /// Reverse word order, a crude stand-in for an SOV/VSO round trip
    Reorder,

    /// Every call fails
    Error(String),

    /// Calls into this target language fail, others return the input
    FailOn(String),

    /// No-op: return input unchanged
    NoOp,
}

/// One recorded translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Mutex<Vec<MockCall>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator that sleeps `delay_ms` before every call
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// `(source, target)` of every call so far
    pub fn hops(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|c| (c.source, c.target))
            .collect()
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn record(&self, text: &str, source: &str, target: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                text: text.to_string(),
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map.get(&key).cloned().unwrap_or_else(|| text.to_string()))
            }
            MockMode::Reorder => Ok(text.split_whitespace().rev().collect::<Vec<_>>().join(" ")),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::FailOn(failing) if failing == target => Err(MtError::TranslationError(
                format!("unsupported language pair: {}", target),
            )),
            MockMode::FailOn(_) | MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.record(text, source_locale, target_locale);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        self.apply_delay().await;

        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            self.record(text, source_locale, target_locale);
            results.push(self.apply_translation(text, target_locale)?);
        }
        Ok(results)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
