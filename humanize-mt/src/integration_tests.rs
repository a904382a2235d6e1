//! End-to-End Integration Tests for the humanize pipeline
//!
//! These tests drive [`Humanizer`](crate::Humanizer) from request to
//! response. Most run against [`MockTranslator`](crate::MockTranslator); the
//! ones marked `#[ignore]` call Google Translate.
//!
//! # Running Integration Tests
//!
//! ```bash
//! export GOOGLE_TRANSLATE_API_KEY=...
//! cargo test -p humanize-mt integration_tests -- --ignored --nocapture
//! ```

#[cfg(test)]
mod tests {
    use super::super::*;
    use fastrand::Rng;
    use humanize::{
        InMemoryLexicon, LexicalDatabase, inject_invisible_separators, is_invisible_separator,
        spike_lexical_choice, strip_invisible_separators,
    };
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    /// Skip test if API key not available
    fn require_api_key() -> bool {
        std::env::var("GOOGLE_TRANSLATE_API_KEY").is_ok()
    }

    fn lexicon() -> Arc<InMemoryLexicon> {
        let mut lexicon = InMemoryLexicon::new();
        lexicon
            .with_synset(&["quick", "speedy", "fast", "agile"])
            .with_synset(&["brown", "brownish", "chocolate-brown"])
            .with_synset(&["quietly", "softly", "silently"])
            .with_synset(&["jumps", "leaps", "bounds"]);
        Arc::new(lexicon)
    }

    fn humanizer(translator: Arc<dyn MachineTranslator>) -> Humanizer {
        let chain = TranslationChain::new(translator, Duration::from_secs(5));
        Humanizer::new(chain, lexicon())
    }

    // ============================================================================
    // Deep mode
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_deep_fail_soft_matches_direct_stages() {
        let text = "The quick brown fox";
        let mock = Arc::new(MockTranslator::new(MockMode::Error("quota exceeded".to_string())));
        let humanizer = humanizer(mock.clone());

        for seed in [1, 2, 3, 42, 1000] {
            let deep = humanizer
                .transform(
                    text,
                    Tone::Standard,
                    TransformationMode::Deep,
                    &mut Rng::with_seed(seed),
                )
                .await
                .unwrap();
            let direct = humanizer.perturb(text, &mut Rng::with_seed(seed));
            assert_eq!(deep, direct, "seed {}", seed);
        }
    }

    #[tokio::test]
    async fn test_e2e_deep_request_reports_changes() {
        let text = "The quick brown fox jumps quietly";
        let mock = Arc::new(MockTranslator::new(MockMode::Reorder));
        let request = HumanizeRequest::new(text).with_deep_mode(true);

        let response = humanizer(mock.clone())
            .humanize_with_rng(&request, &mut Rng::with_seed(9))
            .await
            .unwrap();

        assert_eq!(response.original, text);
        assert_eq!(response.mode, TransformationMode::Deep);
        assert_eq!(
            mock.hops(),
            vec![
                ("auto".to_string(), "ar".to_string()),
                ("ar".to_string(), "ko".to_string()),
                ("ko".to_string(), "en".to_string()),
            ]
        );
        // Three reversals leave the words reversed
        let clean = strip_invisible_separators(&response.humanized);
        assert_eq!(clean.split(' ').count(), 6);
        assert!(clean.ends_with("The"));
        assert!(response.changed_words > 0);
        assert!(response.structural_changes.ends_with('%'));
        assert!(!response.diff_html.chars().any(is_invisible_separator));
    }

    #[tokio::test]
    async fn test_e2e_deep_is_reproducible_with_seed() {
        let mock = Arc::new(MockTranslator::new(MockMode::NoOp));
        let humanizer = humanizer(mock);
        let request =
            HumanizeRequest::new("The quick brown fox jumps quietly").with_deep_mode(true);

        let first = humanizer
            .humanize_with_rng(&request, &mut Rng::with_seed(123))
            .await
            .unwrap();
        let second = humanizer
            .humanize_with_rng(&request, &mut Rng::with_seed(123))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_e2e_deep_timeout_falls_back() {
        let mock = Arc::new(MockTranslator::with_delay(MockMode::Suffix, 300));
        let chain = TranslationChain::new(mock, Duration::from_millis(10));
        let humanizer = Humanizer::new(chain, lexicon());

        let output = humanizer
            .transform("stay", Tone::Standard, TransformationMode::Deep, &mut Rng::with_seed(4))
            .await
            .unwrap();
        assert_eq!(strip_invisible_separators(&output), "stay");
    }

    // ============================================================================
    // Shallow mode
    // ============================================================================

    #[tokio::test]
    async fn test_e2e_shallow_scenario_bounds() {
        let text = "The cat sat quietly on the mat";
        let mut mappings = HashMap::new();
        mappings.insert(
            (text.to_string(), "fr".to_string()),
            "Le chat était assis tranquillement sur le tapis".to_string(),
        );
        mappings.insert(
            (
                "Le chat était assis tranquillement sur le tapis".to_string(),
                "en".to_string(),
            ),
            "The cat was sitting quietly on the carpet".to_string(),
        );
        let mock = Arc::new(MockTranslator::new(MockMode::Mappings(mappings)));

        let response = humanizer(mock.clone())
            .humanize(&HumanizeRequest::new(text))
            .await
            .unwrap();

        assert_eq!(response.humanized, "The cat was sitting quietly on the carpet");
        assert_eq!(response.mode, TransformationMode::Shallow);
        let score: f64 = response.structural_changes.trim_end_matches('%').parse().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(response.longest_unchanged, "quietly on the");
        assert_eq!(mock.hops().len(), 2);
    }

    #[tokio::test]
    async fn test_e2e_shallow_identity_round_trip() {
        let text = "The cat sat quietly on the mat";
        let mock = Arc::new(MockTranslator::new(MockMode::NoOp));
        let response = humanizer(mock)
            .humanize(&HumanizeRequest::new(text))
            .await
            .unwrap();

        assert_eq!(response.humanized, text);
        assert_eq!(response.structural_changes, "0.0%");
        assert_eq!(response.changed_words, 0);
        assert_eq!(response.longest_unchanged, text);
    }

    #[tokio::test]
    async fn test_e2e_shallow_failure_is_generic() {
        let mock = Arc::new(MockTranslator::new(MockMode::FailOn("en".to_string())));
        let err = humanizer(mock)
            .humanize(&HumanizeRequest::new("The cat sat").with_tone(Tone::Professional))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Translation(_)));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_e2e_request_from_json() {
        let request: HumanizeRequest =
            serde_json::from_str(r#"{"text": "hello there", "tone": "professional"}"#).unwrap();
        let mock = Arc::new(MockTranslator::new(MockMode::Suffix));
        let response = humanizer(mock).humanize(&request).await.unwrap();

        assert_eq!(response.humanized, "hello there_ja_en");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["changed_words"], 2);
        assert_eq!(json["longest_unchanged"], "hello");
    }

    // ============================================================================
    // Stage scenarios
    // ============================================================================

    #[test]
    fn test_no_synonyms_keeps_word() {
        let lexicon = lexicon();
        let db: &dyn LexicalDatabase = lexicon.as_ref();
        for seed in 0..20 {
            let output = spike_lexical_choice(db, "quickly", 1.0, &mut Rng::with_seed(seed));
            assert_eq!(output, "quickly");
        }
    }

    #[test]
    fn test_short_token_not_injected() {
        for seed in 0..20 {
            assert_eq!(inject_invisible_separators("ab", &mut Rng::with_seed(seed)), "ab");
        }
    }

    // ============================================================================
    // Real API
    // ============================================================================

    #[tokio::test]
    #[ignore]
    async fn test_e2e_google_shallow() {
        if !require_api_key() {
            eprintln!("Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let provider = GoogleTranslateProvider::from_env().unwrap();
        let response = humanizer(Arc::new(provider))
            .humanize(&HumanizeRequest::new("The cat sat quietly on the mat"))
            .await
            .unwrap();

        println!("Humanized: {}", response.humanized);
        println!("Structural changes: {}", response.structural_changes);
        assert!(!response.humanized.is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn test_e2e_google_deep() {
        if !require_api_key() {
            eprintln!("Skipping: GOOGLE_TRANSLATE_API_KEY not set");
            return;
        }

        let provider = GoogleTranslateProvider::from_env().unwrap();
        let request = HumanizeRequest::new("The quick brown fox jumps over the lazy dog")
            .with_deep_mode(true);
        let response = humanizer(Arc::new(provider)).humanize(&request).await.unwrap();

        println!("Humanized: {}", response.humanized);
        println!("Longest unchanged: {}", response.longest_unchanged);
        assert!(!strip_invisible_separators(&response.humanized).trim().is_empty());
    }
}
