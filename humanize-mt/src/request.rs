//! Request and response schema
//!
//! The typed boundary of the pipeline. Front ends (the CLI, or any service
//! embedding the library) deserialize a [`HumanizeRequest`], hand it to
//! [`Humanizer::humanize`](crate::pipeline::Humanizer::humanize), and
//! serialize the [`HumanizeResponse`].
//!
//! ```json
//! { "text": "The cat sat quietly on the mat", "tone": "standard", "deep_mode": false }
//! ```

use humanize::ChangeReport;
use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineError, Tone, TransformationMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizeRequest {
    /// Text to transform; must not be empty
    #[serde(default)]
    pub text: String,
    /// Defaults to `standard`
    #[serde(default)]
    pub tone: Tone,
    /// Defaults to `false` (shallow mode)
    #[serde(default)]
    pub deep_mode: bool,
}

impl HumanizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::default(),
            deep_mode: false,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_deep_mode(mut self, deep_mode: bool) -> Self {
        self.deep_mode = deep_mode;
        self
    }

    pub fn mode(&self) -> TransformationMode {
        TransformationMode::from_deep_flag(self.deep_mode)
    }

    /// Only the empty string is rejected; whitespace-only text goes through
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.text.is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanizeResponse {
    pub original: String,
    pub humanized: String,
    pub mode: TransformationMode,
    pub diff_html: String,
    /// Longest unchanged span, or `"None"`
    pub longest_unchanged: String,
    /// Structural score formatted as a percentage, e.g. `"42.9%"`
    pub structural_changes: String,
    pub changed_words: usize,
}

impl HumanizeResponse {
    pub fn new(
        original: &str,
        humanized: String,
        mode: TransformationMode,
        report: &ChangeReport,
    ) -> Self {
        Self {
            original: original.to_string(),
            humanized,
            mode,
            diff_html: report.render_html(),
            longest_unchanged: report.longest_unchanged_or_none().to_string(),
            structural_changes: format!("{:.1}%", report.structural_score),
            changed_words: report.changed_words_count,
        }
    }
}

/// Body returned in place of a response when the pipeline fails
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: err.public_message().to_string(),
        }
    }
}
