//! Lexical substitution stage
//!
//! Swaps longer words for a randomly chosen synonym. Language models pick
//! the most likely word; a uniform pick over the whole synonym set tends to
//! land on a less predictable one.

use fastrand::Rng;

use crate::lexicon::LexicalDatabase;
use crate::rejoin_words;

/// Tokens at or below this many code points are never substituted
pub const MIN_SUBSTITUTION_CHARS: usize = 4;

/// Single-word synonyms of `word`, excluding the word itself
///
/// Comparison with the input is case-insensitive; lemmas joined with `_`
/// (multi-word phrases) are dropped.
pub fn synonym_candidates(lexicon: &dyn LexicalDatabase, word: &str) -> Vec<String> {
    let lowered = word.to_lowercase();
    lexicon
        .synonyms(&lowered)
        .into_iter()
        .filter(|lemma| lemma.to_lowercase() != lowered && !lemma.contains('_'))
        .collect()
}

/// Pick a synonym of `word` uniformly at random
///
/// Returns `word` unchanged when the database has no eligible candidate.
pub fn rare_synonym(lexicon: &dyn LexicalDatabase, word: &str, rng: &mut Rng) -> String {
    let candidates = synonym_candidates(lexicon, word);
    match rng.choice(candidates) {
        Some(choice) => choice,
        None => word.to_string(),
    }
}

/// Replace each word longer than four code points with probability
/// `intensity`
///
/// `intensity` is clamped to `[0, 1]`. Output words are joined with single
/// spaces, so the original spacing and line breaks are not preserved.
pub fn spike_lexical_choice(
    lexicon: &dyn LexicalDatabase,
    text: &str,
    intensity: f64,
    rng: &mut Rng,
) -> String {
    let intensity = intensity.clamp(0.0, 1.0);
    let mut swapped = 0usize;

    let words = text.split_whitespace().map(|word| {
        if word.chars().count() > MIN_SUBSTITUTION_CHARS && rng.f64() < intensity {
            let replacement = rare_synonym(lexicon, word, rng);
            if replacement != word {
                swapped += 1;
            }
            replacement
        } else {
            word.to_string()
        }
    });
    let output = rejoin_words(words);

    tracing::debug!(swapped, intensity, "lexical substitution applied");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::InMemoryLexicon;

    fn lexicon() -> InMemoryLexicon {
        let mut lexicon = InMemoryLexicon::new();
        lexicon
            .with_synset(&["quiet", "placid", "still", "tranquil"])
            .with_synset(&["Quickly", "rapidly", "speedily", "in_haste"])
            .with_synset(&["brown", "brownish", "chocolate-brown"]);
        lexicon
    }

    #[test]
    fn test_candidates_exclude_input_and_phrases() {
        let candidates = synonym_candidates(&lexicon(), "quickly");
        assert_eq!(candidates, vec!["rapidly", "speedily"]);
    }

    #[test]
    fn test_candidates_case_insensitive_lookup() {
        let candidates = synonym_candidates(&lexicon(), "QUIET");
        assert_eq!(candidates, vec!["placid", "still", "tranquil"]);
    }

    #[test]
    fn test_rare_synonym_picks_a_candidate() {
        let lexicon = lexicon();
        let mut rng = Rng::with_seed(7);
        for _ in 0..20 {
            let choice = rare_synonym(&lexicon, "quiet", &mut rng);
            assert!(["placid", "still", "tranquil"].contains(&choice.as_str()));
        }
    }

    #[test]
    fn test_rare_synonym_miss_returns_word() {
        let mut rng = Rng::with_seed(1);
        assert_eq!(rare_synonym(&lexicon(), "zebra", &mut rng), "zebra");
    }

    #[test]
    fn test_rare_synonym_only_self_returns_word() {
        let mut lexicon = InMemoryLexicon::new();
        lexicon.with_synset(&["alone", "Alone", "all_by_oneself"]);
        let mut rng = Rng::with_seed(1);
        assert_eq!(rare_synonym(&lexicon, "alone", &mut rng), "alone");
    }

    #[test]
    fn test_spike_without_synonyms_is_identity() {
        let lexicon = InMemoryLexicon::new();
        let mut rng = Rng::with_seed(3);
        assert_eq!(
            spike_lexical_choice(&lexicon, "quickly", 1.0, &mut rng),
            "quickly"
        );
    }

    #[test]
    fn test_spike_full_intensity_replaces_long_words() {
        let mut rng = Rng::with_seed(11);
        let output = spike_lexical_choice(&lexicon(), "The brown fox ran quickly", 1.0, &mut rng);
        let words: Vec<&str> = output.split(' ').collect();
        assert_eq!(words.len(), 5);
        assert_eq!(words[0], "The");
        assert_ne!(words[1], "brown");
        assert_eq!(words[2], "fox");
        assert_eq!(words[3], "ran");
        assert!(["rapidly", "speedily"].contains(&words[4]));
    }

    #[test]
    fn test_spike_zero_intensity_only_collapses_whitespace() {
        let mut rng = Rng::with_seed(5);
        assert_eq!(
            spike_lexical_choice(&lexicon(), "  quiet\n\nbrown   fox ", 0.0, &mut rng),
            "quiet brown fox"
        );
    }

    #[test]
    fn test_spike_skips_short_words() {
        let mut lexicon = InMemoryLexicon::new();
        lexicon.with_synset(&["calm", "still"]);
        let mut rng = Rng::with_seed(9);
        assert_eq!(spike_lexical_choice(&lexicon, "calm", 1.0, &mut rng), "calm");
    }

    #[test]
    fn test_spike_intensity_is_clamped() {
        let mut rng = Rng::with_seed(2);
        let output = spike_lexical_choice(&lexicon(), "quiet", 5.0, &mut rng);
        assert_ne!(output, "quiet");
        let output = spike_lexical_choice(&lexicon(), "quiet", -1.0, &mut rng);
        assert_eq!(output, "quiet");
    }

    #[test]
    fn test_spike_is_replayable_with_seed() {
        let lexicon = lexicon();
        let text = "quiet brown quickly quiet brown quickly";
        let a = spike_lexical_choice(&lexicon, text, 0.5, &mut Rng::with_seed(42));
        let b = spike_lexical_choice(&lexicon, text, 0.5, &mut Rng::with_seed(42));
        assert_eq!(a, b);
    }
}
