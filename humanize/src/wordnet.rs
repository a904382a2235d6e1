//! WordNet database loader
//!
//! Reads the `data.{noun,verb,adj,adv}` files of a WordNet 3.x database
//! (WNDB format, as shipped by Princeton and bundled by most NLP toolkits)
//! into memory, together with the optional `*.exc` morphological exception
//! lists.
//!
//! Lookups reduce inflected forms to their base forms before consulting the
//! synset index ("running" → "run", "geese" → "goose"), so that a word taken
//! straight out of running text still finds its synonyms.
//!
//! # Data line layout
//!
//! ```text
//! 00001740 03 n 01 entity 0 003 ~ 00001930 n 0000 ... | gloss
//! ^offset  ^lex ^type ^word count (hex) ^word ^lex_id ...
//! ```
//!
//! Lines starting with a space are the license header and are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LexiconError, LexiconResult};
use crate::lexicon::{InMemoryLexicon, LexicalDatabase};

/// WordNet part of speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    /// File suffix used by WNDB (`data.noun`, `adj.exc`, ...)
    pub fn file_suffix(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
        }
    }

    /// Inflectional suffix detachment rules, tried in order
    fn detachment_rules(self) -> &'static [(&'static str, &'static str)] {
        match self {
            PartOfSpeech::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("ves", "f"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            PartOfSpeech::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            PartOfSpeech::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            PartOfSpeech::Adverb => &[],
        }
    }
}

/// In-memory WordNet synset index with base-form reduction
#[derive(Debug, Clone)]
pub struct WordNet {
    root: PathBuf,
    lexicons: HashMap<PartOfSpeech, InMemoryLexicon>,
    exceptions: HashMap<PartOfSpeech, HashMap<String, Vec<String>>>,
}

impl WordNet {
    /// Load a WordNet database directory
    ///
    /// All four `data.*` files must be present. Exception lists are optional;
    /// without them irregular forms ("geese", "ran") are not reduced.
    pub fn load(dir: &Path) -> LexiconResult<Self> {
        let mut lexicons = HashMap::new();
        let mut exceptions = HashMap::new();

        for pos in PartOfSpeech::ALL {
            let data_path = dir.join(format!("data.{}", pos.file_suffix()));
            lexicons.insert(pos, parse_data_file(&data_path)?);

            let exc_path = dir.join(format!("{}.exc", pos.file_suffix()));
            if exc_path.is_file() {
                exceptions.insert(pos, parse_exception_file(&exc_path)?);
            }
        }

        let wordnet = Self {
            root: dir.to_path_buf(),
            lexicons,
            exceptions,
        };
        if wordnet.synset_count() == 0 {
            return Err(LexiconError::Empty(dir.to_path_buf()));
        }

        tracing::info!(
            path = %dir.display(),
            synsets = wordnet.synset_count(),
            "loaded WordNet database"
        );
        Ok(wordnet)
    }

    /// Directory the database was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base forms of `word` that exist in the index for `pos`, most specific
    /// first. The surface form itself is included when it is indexed.
    ///
    /// Exception lists take precedence over the detachment rules. The rules
    /// are re-applied to their own output until some pass yields an indexed
    /// form or nothing is left to detach.
    pub fn base_forms(&self, word: &str, pos: PartOfSpeech) -> Vec<String> {
        let Some(lexicon) = self.lexicons.get(&pos) else {
            return Vec::new();
        };
        let form = word.to_lowercase().replace(' ', "_");

        if let Some(bases) = self.exceptions.get(&pos).and_then(|exc| exc.get(&form)) {
            let candidates = std::iter::once(form.clone()).chain(bases.iter().cloned());
            return indexed_forms(lexicon, candidates);
        }

        let mut detached = detach_suffixes(std::slice::from_ref(&form), pos);
        let found = indexed_forms(
            lexicon,
            std::iter::once(form.clone()).chain(detached.iter().cloned()),
        );
        if !found.is_empty() {
            return found;
        }
        while !detached.is_empty() {
            detached = detach_suffixes(&detached, pos);
            let found = indexed_forms(lexicon, detached.iter().cloned());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

/// One pass of the detachment rules over every form
fn detach_suffixes(forms: &[String], pos: PartOfSpeech) -> Vec<String> {
    let mut output: Vec<String> = Vec::new();
    for form in forms {
        for (suffix, ending) in pos.detachment_rules() {
            if let Some(stem) = form.strip_suffix(suffix) {
                let candidate = format!("{}{}", stem, ending);
                if !candidate.is_empty() && !output.contains(&candidate) {
                    output.push(candidate);
                }
            }
        }
    }
    output
}

/// `candidates` present in `lexicon`, deduplicated, in order
fn indexed_forms<I>(lexicon: &InMemoryLexicon, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut forms: Vec<String> = Vec::new();
    for candidate in candidates {
        if !candidate.is_empty() && lexicon.contains(&candidate) && !forms.contains(&candidate) {
            forms.push(candidate);
        }
    }
    forms
}

impl LexicalDatabase for WordNet {
    fn synonyms(&self, word: &str) -> Vec<String> {
        let mut lemmas = Vec::new();
        for pos in PartOfSpeech::ALL {
            let Some(lexicon) = self.lexicons.get(&pos) else {
                continue;
            };
            for form in self.base_forms(word, pos) {
                lemmas.extend(lexicon.synonyms(&form));
            }
        }
        lemmas
    }

    fn synset_count(&self) -> usize {
        self.lexicons.values().map(|l| l.synset_count()).sum()
    }
}

fn read_file(path: &Path) -> LexiconResult<String> {
    fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `data.*` file into one synonym group per line
fn parse_data_file(path: &Path) -> LexiconResult<InMemoryLexicon> {
    let content = read_file(path)?;
    let mut lexicon = InMemoryLexicon::new();

    for (index, line) in content.lines().enumerate() {
        if line.is_empty() || line.starts_with(' ') {
            continue;
        }
        let lemmas = parse_data_line(line).map_err(|reason| LexiconError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;
        lexicon.with_synset(&lemmas);
    }
    Ok(lexicon)
}

fn parse_data_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = line.split_whitespace();
    // offset, lex_filenum, ss_type
    for name in ["synset offset", "lexicographer file", "synset type"] {
        fields.next().ok_or_else(|| format!("missing {}", name))?;
    }
    let count_field = fields.next().ok_or("missing word count")?;
    let count = usize::from_str_radix(count_field, 16)
        .map_err(|_| format!("invalid word count '{}'", count_field))?;

    let mut lemmas = Vec::with_capacity(count);
    for _ in 0..count {
        let word = fields.next().ok_or("truncated word list")?;
        fields.next().ok_or("missing lex_id")?;
        lemmas.push(strip_adjective_marker(word).to_string());
    }
    Ok(lemmas)
}

/// Adjectives may carry a syntactic marker: `galore(ip)`, `elect(p)`
fn strip_adjective_marker(word: &str) -> &str {
    match word.find('(') {
        Some(pos) if word.ends_with(')') => &word[..pos],
        _ => word,
    }
}

fn parse_exception_file(path: &Path) -> LexiconResult<HashMap<String, Vec<String>>> {
    let content = read_file(path)?;
    let mut exceptions = HashMap::new();

    for (index, line) in content.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let Some(inflected) = fields.next() else {
            continue;
        };
        let bases: Vec<String> = fields.map(str::to_string).collect();
        if bases.is_empty() {
            return Err(LexiconError::Parse {
                path: path.to_path_buf(),
                line: index + 1,
                reason: format!("exception '{}' has no base form", inflected),
            });
        }
        exceptions.insert(inflected.to_string(), bases);
    }
    Ok(exceptions)
}
