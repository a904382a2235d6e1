//! Text perturbation stages and change metrics
//!
//! This crate holds the word- and character-level stages of the humanize
//! pipeline together with the metrics used to report how much a text changed.
//! Translation chaining and orchestration live in `humanize-mt`.
//!
//! Every stage takes the previous text by reference and returns a new
//! `String`. Randomness is passed in as an explicit [`fastrand::Rng`] so a
//! seeded generator replays the exact same output.
//!
//! # Stages
//!
//! 1. [`spike_lexical_choice`] - swap longer words for random synonyms from a
//!    [`LexicalDatabase`]
//! 2. [`mix_normalization_forms`] - re-encode each scalar value as NFC or NFD
//! 3. [`inject_invisible_separators`] - hide zero-width code points inside words
//!
//! # Example
//!
//! ```ignore
//! use fastrand::Rng;
//! use humanize::{InMemoryLexicon, compute_change_report, spike_lexical_choice};
//!
//! let mut lexicon = InMemoryLexicon::new();
//! lexicon.with_synset(&["quietly", "softly", "silently"]);
//!
//! let mut rng = Rng::with_seed(7);
//! let output = spike_lexical_choice(&lexicon, "The cat sat quietly", 1.0, &mut rng);
//! let report = compute_change_report("The cat sat quietly", &output);
//! println!("{}", report);
//! ```

pub mod error;
pub mod invisible;
pub mod lexicon;
pub mod metrics;
pub mod substitution;
pub mod unicode_mix;
pub mod wordnet;

pub use error::{LexiconError, LexiconResult};
pub use invisible::{
    INVISIBLE_SEPARATORS, inject_invisible_separators, is_invisible_separator,
    strip_invisible_separators,
};
pub use lexicon::{InMemoryLexicon, LexicalDatabase};
pub use metrics::{ChangeReport, DiffTag, DiffToken, compute_change_report, similarity_ratio};
pub use substitution::{rare_synonym, spike_lexical_choice, synonym_candidates};
pub use unicode_mix::mix_normalization_forms;
pub use wordnet::{PartOfSpeech, WordNet};

/// Join words with single spaces
pub(crate) fn rejoin_words<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = String::new();
    for (i, word) in words.into_iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        output.push_str(word.as_ref());
    }
    output
}
