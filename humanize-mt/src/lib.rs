//! Machine-translation driven text humanizer
//!
//! This crate wires the text stages of the `humanize` crate to machine
//! translation: a shallow round trip through one pivot language, or a deep
//! chain through Arabic and Korean followed by lexical substitution,
//! normalization mixing and invisible separator injection.
//!
//! # Workflow Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use humanize_mt::{GoogleTranslateProvider, HumanizeConfig, HumanizeRequest, Tone};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configuration from file and environment
//!     let config = HumanizeConfig::load(None)?;
//!
//!     // 2. Provider and lexical database
//!     let provider = Arc::new(config.google_provider()?);
//!     let humanizer = config.build_humanizer(provider)?;
//!
//!     // 3. Run one request
//!     let request = HumanizeRequest::new("The cat sat quietly on the mat")
//!         .with_tone(Tone::Professional)
//!         .with_deep_mode(true);
//!     let response = humanizer.humanize(&request).await?;
//!
//!     println!("{} ({})", response.humanized, response.structural_changes);
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod pipeline;
pub mod request;
pub mod translator;

// Integration tests (only available during testing)
#[cfg(test)]
mod integration_tests;

// Re-export main types for convenient access
pub use chain::{DEFAULT_HOME_LANGUAGE, SHATTER_PIVOTS, TranslationChain};
pub use config::HumanizeConfig;
pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockCall, MockMode, MockTranslator};
pub use pipeline::{
    EMPTY_INPUT_MESSAGE, GENERIC_FAILURE_MESSAGE, Humanizer, PipelineError, PipelineSettings,
    Tone, TransformationMode,
};
pub use request::{ErrorResponse, HumanizeRequest, HumanizeResponse};
pub use translator::{AUTO_DETECT, MachineTranslator};
