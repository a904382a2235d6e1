//! Lexical database abstraction
//!
//! A lexical database maps a word to the synonym groups (synsets) it belongs
//! to. The substitution stage only needs the flattened list of lemmas across
//! every sense of a word, so that is all the [`LexicalDatabase`] trait asks
//! for. Implementations are loaded once at startup and shared read-only
//! between concurrent requests.
//!
//! # Example
//!
//! ```ignore
//! use humanize::{InMemoryLexicon, LexicalDatabase};
//!
//! let mut lexicon = InMemoryLexicon::new();
//! lexicon.with_synset(&["quick", "speedy", "fast"]);
//! assert_eq!(lexicon.synonyms("Quick"), vec!["quick", "speedy", "fast"]);
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{LexiconError, LexiconResult};

/// Read-only synonym lookup
pub trait LexicalDatabase: Send + Sync {
    /// Every lemma of every synonym group `word` belongs to, in sense order.
    ///
    /// The lookup is case-insensitive. The returned lemmas may include the
    /// word itself and multi-word lemmas joined with `_`; filtering is the
    /// caller's job.
    fn synonyms(&self, word: &str) -> Vec<String>;

    /// Number of synonym groups held by this database
    fn synset_count(&self) -> usize;
}

/// Synonym groups held in memory, indexed by lowercase lemma
#[derive(Debug, Clone, Default)]
pub struct InMemoryLexicon {
    synsets: Vec<Vec<String>>,
    index: HashMap<String, Vec<usize>>,
}

impl InMemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one synonym group. Lemmas keep their original spelling;
    /// the index is keyed by the lowercase form.
    pub fn with_synset<S: AsRef<str>>(&mut self, lemmas: &[S]) -> &mut Self {
        let id = self.synsets.len();
        let lemmas: Vec<String> = lemmas.iter().map(|l| l.as_ref().to_string()).collect();
        for lemma in &lemmas {
            let ids = self.index.entry(lemma.to_lowercase()).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.synsets.push(lemmas);
        self
    }

    /// Whether `word` (case-insensitive) appears in any synonym group
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(&word.to_lowercase())
    }

    /// Load synonym groups from a JSON file shaped as a list of lemma lists:
    ///
    /// ```json
    /// [["quick", "speedy", "fast"], ["sat", "seated"]]
    /// ```
    pub fn load_json(path: &Path) -> LexiconResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let groups: Vec<Vec<String>> =
            serde_json::from_str(&content).map_err(|source| LexiconError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let mut lexicon = Self::new();
        for group in groups.iter().filter(|g| !g.is_empty()) {
            lexicon.with_synset(group);
        }
        if lexicon.synsets.is_empty() {
            return Err(LexiconError::Empty(path.to_path_buf()));
        }
        tracing::info!(
            path = %path.display(),
            synsets = lexicon.synsets.len(),
            "loaded JSON lexicon"
        );
        Ok(lexicon)
    }

    pub(crate) fn synset_ids(&self, key: &str) -> Option<&[usize]> {
        self.index.get(key).map(Vec::as_slice)
    }

    pub(crate) fn synset(&self, id: usize) -> &[String] {
        &self.synsets[id]
    }
}

impl LexicalDatabase for InMemoryLexicon {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.synset_ids(&word.to_lowercase())
            .map(|ids| {
                ids.iter()
                    .flat_map(|&id| self.synset(id).iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn synset_count(&self) -> usize {
        self.synsets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut lexicon = InMemoryLexicon::new();
        lexicon.with_synset(&["Quick", "speedy"]);
        assert_eq!(lexicon.synonyms("QUICK"), vec!["Quick", "speedy"]);
        assert_eq!(lexicon.synonyms("speedy"), vec!["Quick", "speedy"]);
    }

    #[test]
    fn test_lookup_spans_every_sense() {
        let mut lexicon = InMemoryLexicon::new();
        lexicon
            .with_synset(&["bank", "depository_financial_institution"])
            .with_synset(&["bank", "cant", "camber"]);
        assert_eq!(
            lexicon.synonyms("bank"),
            vec!["bank", "depository_financial_institution", "bank", "cant", "camber"]
        );
        assert_eq!(lexicon.synset_count(), 2);
    }

    #[test]
    fn test_unknown_word_has_no_synonyms() {
        let lexicon = InMemoryLexicon::new();
        assert!(lexicon.synonyms("quickly").is_empty());
        assert!(!lexicon.contains("quickly"));
    }

    #[test]
    fn test_duplicate_lemma_in_one_synset_indexed_once() {
        let mut lexicon = InMemoryLexicon::new();
        lexicon.with_synset(&["fast", "Fast", "quick"]);
        assert_eq!(lexicon.synonyms("fast").len(), 3);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[["quick", "speedy"], [], ["sat", "seated"]]"#).unwrap();

        let lexicon = InMemoryLexicon::load_json(file.path()).unwrap();
        assert_eq!(lexicon.synset_count(), 2);
        assert_eq!(lexicon.synonyms("seated"), vec!["sat", "seated"]);
    }

    #[test]
    fn test_load_json_empty_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(matches!(
            InMemoryLexicon::load_json(file.path()),
            Err(LexiconError::Empty(_))
        ));
    }

    #[test]
    fn test_load_json_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            InMemoryLexicon::load_json(file.path()),
            Err(LexiconError::Json { .. })
        ));
    }

    #[test]
    fn test_load_json_missing_file() {
        let result = InMemoryLexicon::load_json(Path::new("/nonexistent/lexicon.json"));
        assert!(matches!(result, Err(LexiconError::Io { .. })));
    }
}
