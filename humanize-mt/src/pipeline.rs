//! Transformation pipeline
//!
//! [`Humanizer`] composes the translation chains from [`crate::chain`] with
//! the text stages from the `humanize` crate:
//!
//! - [`TransformationMode::Shallow`]: a single round trip through the pivot
//!   language picked by the [`Tone`].
//! - [`TransformationMode::Deep`]: shatter chain (fail-soft) → lexical
//!   substitution → normalization-form mixing → invisible separator
//!   injection, always in that order.
//!
//! The humanizer holds no per-request state. Randomness comes from the
//! [`Rng`] passed into [`Humanizer::transform`]; [`Humanizer::humanize`]
//! seeds a fresh generator from entropy for every request.

use std::fmt;
use std::sync::Arc;

use fastrand::Rng;
use humanize::{
    LexicalDatabase, LexiconError, compute_change_report, inject_invisible_separators,
    mix_normalization_forms, spike_lexical_choice,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::TranslationChain;
use crate::error::MtError;
use crate::request::{HumanizeRequest, HumanizeResponse};

/// Message returned to callers for any non-client failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Processing failed. Text may be too long.";

/// Message returned when the request has no text
pub const EMPTY_INPUT_MESSAGE: &str = "No text provided";

/// Pipeline-level failures
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input text absent or empty; rejected before the pipeline runs
    #[error("no text provided")]
    EmptyInput,
    /// Input longer than the configured limit
    #[error("input has {chars} characters, limit is {limit}")]
    InputTooLarge { chars: usize, limit: usize },
    /// Shallow-mode translation failed
    #[error("translation failed: {0}")]
    Translation(#[from] MtError),
    /// Lexical database could not be loaded
    #[error("lexical database unavailable: {0}")]
    Lexicon(#[from] LexiconError),
    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Whether the caller, not the pipeline, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::EmptyInput)
    }

    /// Message safe to show the caller; internal detail is only logged
    pub fn public_message(&self) -> &'static str {
        if self.is_client_error() {
            EMPTY_INPUT_MESSAGE
        } else {
            GENERIC_FAILURE_MESSAGE
        }
    }
}

/// Register of the shallow round trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Tone {
    #[default]
    Standard,
    Professional,
}

impl Tone {
    /// Pivot language of the shallow round trip
    pub fn pivot_language(self) -> &'static str {
        match self {
            Tone::Professional => "ja",
            Tone::Standard => "fr",
        }
    }
}

/// Any tone other than "professional" is treated as standard
impl From<&str> for Tone {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("professional") {
            Tone::Professional
        } else {
            Tone::Standard
        }
    }
}

impl From<String> for Tone {
    fn from(value: String) -> Self {
        Tone::from(value.as_str())
    }
}

/// A missing or null tone is standard
impl From<Option<String>> for Tone {
    fn from(value: Option<String>) -> Self {
        value.map(Tone::from).unwrap_or_default()
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Standard => write!(f, "standard"),
            Tone::Professional => write!(f, "professional"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformationMode {
    #[default]
    Shallow,
    Deep,
}

impl TransformationMode {
    pub fn from_deep_flag(deep: bool) -> Self {
        if deep {
            TransformationMode::Deep
        } else {
            TransformationMode::Shallow
        }
    }
}

impl fmt::Display for TransformationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformationMode::Shallow => write!(f, "shallow"),
            TransformationMode::Deep => write!(f, "deep"),
        }
    }
}

/// Tunables of the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Substitution probability for words longer than four characters in deep mode
    pub deep_intensity: f64,
    /// Inputs longer than this many characters are rejected
    pub max_input_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            deep_intensity: 0.4,
            max_input_chars: 30_000,
        }
    }
}

/// Pipeline orchestrator
#[derive(Clone)]
pub struct Humanizer {
    chain: TranslationChain,
    lexicon: Arc<dyn LexicalDatabase>,
    settings: PipelineSettings,
}

impl Humanizer {
    pub fn new(chain: TranslationChain, lexicon: Arc<dyn LexicalDatabase>) -> Self {
        Self {
            chain,
            lexicon,
            settings: PipelineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Transform `text` according to `mode` and `tone`
    pub async fn transform(
        &self,
        text: &str,
        tone: Tone,
        mode: TransformationMode,
        rng: &mut Rng,
    ) -> Result<String, PipelineError> {
        let chars = text.chars().count();
        if chars > self.settings.max_input_chars {
            return Err(PipelineError::InputTooLarge {
                chars,
                limit: self.settings.max_input_chars,
            });
        }

        match mode {
            TransformationMode::Shallow => {
                let output = self.chain.round_trip(text, tone.pivot_language()).await?;
                Ok(output)
            }
            TransformationMode::Deep => {
                let shattered = self.chain.shatter(text).await;
                Ok(self.perturb(&shattered, rng))
            }
        }
    }

    /// Deep-mode stages that follow the translation chain
    pub fn perturb(&self, text: &str, rng: &mut Rng) -> String {
        let spiked =
            spike_lexical_choice(self.lexicon.as_ref(), text, self.settings.deep_intensity, rng);
        let mixed = mix_normalization_forms(&spiked, rng);
        inject_invisible_separators(&mixed, rng)
    }

    /// Validate, transform, and measure one request with a fresh generator
    pub async fn humanize(
        &self,
        request: &HumanizeRequest,
    ) -> Result<HumanizeResponse, PipelineError> {
        self.humanize_with_rng(request, &mut Rng::new()).await
    }

    /// Same as [`Humanizer::humanize`] with caller-supplied randomness
    pub async fn humanize_with_rng(
        &self,
        request: &HumanizeRequest,
        rng: &mut Rng,
    ) -> Result<HumanizeResponse, PipelineError> {
        request.validate()?;
        let mode = request.mode();
        tracing::info!(
            %mode,
            tone = %request.tone,
            chars = request.text.chars().count(),
            provider = self.chain.provider_name(),
            "humanize request"
        );

        let humanized = match self.transform(&request.text, request.tone, mode, rng).await {
            Ok(humanized) => humanized,
            Err(err) => {
                tracing::error!(error = %err, %mode, "pipeline failed");
                return Err(err);
            }
        };

        let report = compute_change_report(&request.text, &humanized);
        tracing::info!(
            structural_score = report.structural_score,
            changed_words = report.changed_words_count,
            "humanize finished"
        );
        Ok(HumanizeResponse::new(&request.text, humanized, mode, &report))
    }
}

impl fmt::Debug for Humanizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Humanizer")
            .field("chain", &self.chain)
            .field("synsets", &self.lexicon.synset_count())
            .field("settings", &self.settings)
            .finish()
    }
}
