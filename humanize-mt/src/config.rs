//! Runtime configuration
//!
//! Settings are layered with the `config` crate, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional JSON file
//! 3. `HUMANIZE_*` environment variables
//!
//! | variable | field |
//! |----------|-------|
//! | `GOOGLE_TRANSLATE_API_KEY` | `api_key` |
//! | `HUMANIZE_WORDNET_DIR` | `wordnet_dir` |
//! | `HUMANIZE_LEXICON_JSON` | `lexicon_json` |
//! | `HUMANIZE_TRANSLATE_TIMEOUT_SECS` | `translate_timeout_secs` |
//! | `HUMANIZE_MAX_INPUT_CHARS` | `max_input_chars` |
//! | `HUMANIZE_DEEP_INTENSITY` | `deep_intensity` |
//! | `HUMANIZE_HOME_LANGUAGE` | `home_language` |

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use humanize::{InMemoryLexicon, LexicalDatabase, WordNet};
use serde::Deserialize;

use crate::chain::{DEFAULT_HOME_LANGUAGE, TranslationChain};
use crate::google_translate::{API_KEY_ENV, GoogleTranslateProvider};
use crate::pipeline::{Humanizer, PipelineError, PipelineSettings};
use crate::translator::{MachineTranslator, validate_locale};

/// Prefix of the environment variables read into [`HumanizeConfig`]
pub const ENV_PREFIX: &str = "HUMANIZE";

#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HumanizeConfig {
    /// Google Translate API key; only read from `GOOGLE_TRANSLATE_API_KEY`
    #[serde(skip)]
    pub api_key: Option<String>,
    /// WordNet database directory, preferred over `lexicon_json`
    pub wordnet_dir: Option<PathBuf>,
    /// JSON list of synonym groups
    pub lexicon_json: Option<PathBuf>,
    /// Upper bound for a single translation call
    pub translate_timeout_secs: u64,
    pub max_input_chars: usize,
    /// Substitution probability in deep mode
    pub deep_intensity: f64,
    /// Language the chains translate back into
    pub home_language: String,
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        let settings = PipelineSettings::default();
        Self {
            api_key: None,
            wordnet_dir: None,
            lexicon_json: None,
            translate_timeout_secs: 30,
            max_input_chars: settings.max_input_chars,
            deep_intensity: settings.deep_intensity,
            home_language: DEFAULT_HOME_LANGUAGE.to_string(),
        }
    }
}

impl std::fmt::Debug for HumanizeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HumanizeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("wordnet_dir", &self.wordnet_dir)
            .field("lexicon_json", &self.lexicon_json)
            .field("translate_timeout_secs", &self.translate_timeout_secs)
            .field("max_input_chars", &self.max_input_chars)
            .field("deep_intensity", &self.deep_intensity)
            .field("home_language", &self.home_language)
            .finish()
    }
}

fn config_error(err: ConfigError) -> PipelineError {
    PipelineError::Config(err.to_string())
}

impl HumanizeConfig {
    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        Self::from_sources(path, None, std::env::var(API_KEY_ENV).ok())
    }

    /// Build the layered configuration and validate it
    ///
    /// `env` replaces the process environment when given.
    fn from_sources(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
        api_key: Option<String>,
    ) -> Result<Self, PipelineError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .map_err(config_error)?;

        let mut config: Self = settings.try_deserialize().map_err(config_error)?;
        if api_key.is_some() {
            config.api_key = api_key;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.translate_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "translate_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_input_chars == 0 {
            return Err(PipelineError::Config(
                "max_input_chars must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.deep_intensity) {
            return Err(PipelineError::Config(format!(
                "deep_intensity must be within [0, 1], got {}",
                self.deep_intensity
            )));
        }
        validate_locale(&self.home_language)
            .map_err(|e| PipelineError::Config(format!("home_language: {}", e)))?;
        Ok(())
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            deep_intensity: self.deep_intensity,
            max_input_chars: self.max_input_chars,
        }
    }

    /// Load the configured lexical database
    ///
    /// Failure here is a startup error: the pipeline never runs without one.
    pub fn load_lexicon(&self) -> Result<Arc<dyn LexicalDatabase>, PipelineError> {
        if let Some(dir) = &self.wordnet_dir {
            let wordnet: Arc<dyn LexicalDatabase> = Arc::new(WordNet::load(dir)?);
            return Ok(wordnet);
        }
        if let Some(file) = &self.lexicon_json {
            let lexicon: Arc<dyn LexicalDatabase> = Arc::new(InMemoryLexicon::load_json(file)?);
            return Ok(lexicon);
        }
        Err(PipelineError::Config(
            "no lexical database configured; set HUMANIZE_WORDNET_DIR or HUMANIZE_LEXICON_JSON"
                .to_string(),
        ))
    }

    /// Google Translate provider built from the configured key and timeout
    pub fn google_provider(&self) -> Result<GoogleTranslateProvider, PipelineError> {
        let key = self.api_key.clone().ok_or_else(|| {
            PipelineError::Config(format!("{} environment variable not set", API_KEY_ENV))
        })?;
        Ok(GoogleTranslateProvider::with_timeout(
            key,
            self.translate_timeout(),
        )?)
    }

    /// Assemble a humanizer around `translator` and the configured lexicon
    pub fn build_humanizer(
        &self,
        translator: Arc<dyn MachineTranslator>,
    ) -> Result<Humanizer, PipelineError> {
        let lexicon = self.load_lexicon()?;
        let chain = TranslationChain::new(translator, self.translate_timeout())
            .with_home_language(self.home_language.clone());
        Ok(Humanizer::new(chain, lexicon).with_settings(self.pipeline_settings()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMode, MockTranslator};
    use std::fs;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("humanize.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = HumanizeConfig::from_sources(None, env(&[]), None).unwrap();
        assert_eq!(config, HumanizeConfig::default());
        assert_eq!(config.translate_timeout(), Duration::from_secs(30));
        assert_eq!(config.deep_intensity, 0.4);
        assert_eq!(config.home_language, "en");
    }

    #[test]
    fn test_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"translate_timeout_secs": 5, "deep_intensity": 0.7}"#,
        );

        let config = HumanizeConfig::from_sources(Some(&path), env(&[]), None).unwrap();
        assert_eq!(config.translate_timeout_secs, 5);
        assert_eq!(config.deep_intensity, 0.7);
        assert_eq!(config.max_input_chars, 30_000);
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = HumanizeConfig::from_sources(
            Some(Path::new("/nonexistent/humanize.json")),
            env(&[]),
            None,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_file_cannot_set_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), r#"{"api_key": "leak"}"#);
        let config = HumanizeConfig::from_sources(Some(&path), env(&[]), None).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn test_env_overrides() {
        let config = HumanizeConfig::from_sources(
            None,
            env(&[
                ("HUMANIZE_WORDNET_DIR", "/usr/share/wordnet"),
                ("HUMANIZE_TRANSLATE_TIMEOUT_SECS", "12"),
                ("HUMANIZE_DEEP_INTENSITY", "0.25"),
                ("HUMANIZE_HOME_LANGUAGE", "de"),
            ]),
            Some("abc".to_string()),
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.wordnet_dir, Some(PathBuf::from("/usr/share/wordnet")));
        assert_eq!(config.translate_timeout_secs, 12);
        assert_eq!(config.deep_intensity, 0.25);
        assert_eq!(config.home_language, "de");
    }

    #[test]
    fn test_env_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"translate_timeout_secs": 5, "max_input_chars": 100}"#,
        );
        let config = HumanizeConfig::from_sources(
            Some(&path),
            env(&[("HUMANIZE_TRANSLATE_TIMEOUT_SECS", "9")]),
            None,
        )
        .unwrap();
        assert_eq!(config.translate_timeout_secs, 9);
        assert_eq!(config.max_input_chars, 100);
    }

    #[test]
    fn test_env_bad_timeout() {
        let result = HumanizeConfig::from_sources(
            None,
            env(&[("HUMANIZE_TRANSLATE_TIMEOUT_SECS", "soon")]),
            None,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_layered_values_are_validated() {
        let result = HumanizeConfig::from_sources(
            None,
            env(&[("HUMANIZE_DEEP_INTENSITY", "1.5")]),
            None,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_validate_ranges() {
        let config = HumanizeConfig {
            deep_intensity: 1.5,
            ..HumanizeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HumanizeConfig {
            translate_timeout_secs: 0,
            ..HumanizeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HumanizeConfig {
            home_language: "e n".to_string(),
            ..HumanizeConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_debug_masks_key() {
        let config = HumanizeConfig {
            api_key: Some("secret-key".to_string()),
            ..HumanizeConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_missing_lexicon_is_startup_error() {
        let config = HumanizeConfig::default();
        assert!(matches!(
            config.load_lexicon(),
            Err(PipelineError::Config(_))
        ));

        let config = HumanizeConfig {
            wordnet_dir: Some(PathBuf::from("/nonexistent/wordnet")),
            ..HumanizeConfig::default()
        };
        assert!(matches!(
            config.load_lexicon(),
            Err(PipelineError::Lexicon(_))
        ));
    }

    #[test]
    fn test_missing_api_key() {
        let config = HumanizeConfig::default();
        assert!(matches!(
            config.google_provider(),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_build_humanizer_from_json_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        fs::write(&path, r#"[["quick", "fast"]]"#).unwrap();

        let config = HumanizeConfig {
            lexicon_json: Some(path),
            deep_intensity: 0.9,
            ..HumanizeConfig::default()
        };
        let humanizer = config
            .build_humanizer(Arc::new(MockTranslator::new(MockMode::NoOp)))
            .unwrap();
        assert_eq!(humanizer.settings().deep_intensity, 0.9);
    }
}
