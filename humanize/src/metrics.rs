//! Change metrics between an original text and its transformed version
//!
//! Both texts are split on whitespace and aligned with a longest common
//! subsequence over whole tokens. Invisible separators are stripped from the
//! transformed text first, so a word that only gained a zero-width code point
//! still counts as unchanged.
//!
//! # Example
//!
//! ```ignore
//! use humanize::compute_change_report;
//!
//! let report = compute_change_report("the cat sat", "the dog sat");
//! assert_eq!(report.changed_words_count, 2);
//! assert_eq!(report.structural_score, 33.3);
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::invisible::strip_invisible_separators;

/// Rendered in place of `longest_unchanged` when nothing survived
pub const NO_UNCHANGED_SPAN: &str = "None";

/// Edit script tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Added,
    Removed,
    Unchanged,
}

/// One token of an edit script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffToken {
    pub tag: DiffTag,
    pub text: String,
}

impl DiffToken {
    fn new(tag: DiffTag, text: &str) -> Self {
        Self {
            tag,
            text: text.to_string(),
        }
    }
}

/// Structural change between an original and a transformed text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeReport {
    /// Tokens of the transformed text tagged `Added` or `Unchanged`.
    /// Removed tokens are counted but not rendered.
    pub diff: Vec<DiffToken>,
    /// `(1 - similarity) * 100`, rounded to one decimal place
    pub structural_score: f64,
    /// Longest run of tokens kept in place, joined with single spaces
    #[serde(serialize_with = "serialize_span")]
    pub longest_unchanged: Option<String>,
    /// Added plus removed tokens
    pub changed_words_count: usize,
}

impl ChangeReport {
    /// `longest_unchanged`, or `"None"` when no token survived
    pub fn longest_unchanged_or_none(&self) -> &str {
        self.longest_unchanged.as_deref().unwrap_or(NO_UNCHANGED_SPAN)
    }

    /// Render the diff as HTML spans, one per token, each followed by a space
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        for token in &self.diff {
            let class = match token.tag {
                DiffTag::Added => "added",
                DiffTag::Unchanged => "unchanged",
                DiffTag::Removed => continue,
            };
            html.push_str(&format!(
                "<span class=\"{}\">{}</span> ",
                class,
                escape_html(&token.text)
            ));
        }
        html
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% structural change, {} words changed, longest unchanged: {}",
            self.structural_score,
            self.changed_words_count,
            self.longest_unchanged_or_none()
        )
    }
}

fn serialize_span<S: Serializer>(span: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(span.as_deref().unwrap_or(NO_UNCHANGED_SPAN))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Compare `original` with `transformed` after stripping invisible separators
pub fn compute_change_report(original: &str, transformed: &str) -> ChangeReport {
    let clean = strip_invisible_separators(transformed);
    let original_tokens: Vec<&str> = original.split_whitespace().collect();
    let clean_tokens: Vec<&str> = clean.split_whitespace().collect();

    let script = edit_script(&original_tokens, &clean_tokens);

    let matches = script
        .iter()
        .filter(|t| t.tag == DiffTag::Unchanged)
        .count();
    let changed_words_count = script.len() - matches;
    let ratio = ratio_from_matches(matches, original_tokens.len() + clean_tokens.len());
    let structural_score = round_one_decimal((1.0 - ratio) * 100.0);
    let longest_unchanged = longest_unchanged_run(&script);

    ChangeReport {
        diff: script
            .into_iter()
            .filter(|t| t.tag != DiffTag::Removed)
            .collect(),
        structural_score,
        longest_unchanged,
        changed_words_count,
    }
}

/// Token similarity in `[0, 1]`: `2 * matches / (len(a) + len(b))`
///
/// Two empty texts are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<&str> = a.split_whitespace().collect();
    let b: Vec<&str> = b.split_whitespace().collect();
    let matches = edit_script(&a, &b)
        .iter()
        .filter(|t| t.tag == DiffTag::Unchanged)
        .count();
    ratio_from_matches(matches, a.len() + b.len())
}

fn ratio_from_matches(matches: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        (2 * matches) as f64 / total as f64
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Token-level edit script from `original` to `modified`
///
/// Within each gap between matched tokens, removals come before additions.
pub fn edit_script(original: &[&str], modified: &[&str]) -> Vec<DiffToken> {
    // Common prefix and suffix never need the DP table
    let prefix = original
        .iter()
        .zip(modified)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = original[prefix..]
        .iter()
        .rev()
        .zip(modified[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut script = Vec::with_capacity(original.len().max(modified.len()));
    script.extend(
        original[..prefix]
            .iter()
            .map(|t| DiffToken::new(DiffTag::Unchanged, t)),
    );

    let orig_mid = &original[prefix..original.len() - suffix];
    let mod_mid = &modified[prefix..modified.len() - suffix];
    let lcs = longest_common_subsequence(orig_mid, mod_mid);

    let mut orig_idx = 0;
    let mut mod_idx = 0;
    for (lcs_orig, lcs_mod) in lcs {
        while orig_idx < lcs_orig {
            script.push(DiffToken::new(DiffTag::Removed, orig_mid[orig_idx]));
            orig_idx += 1;
        }
        while mod_idx < lcs_mod {
            script.push(DiffToken::new(DiffTag::Added, mod_mid[mod_idx]));
            mod_idx += 1;
        }
        script.push(DiffToken::new(DiffTag::Unchanged, orig_mid[orig_idx]));
        orig_idx += 1;
        mod_idx += 1;
    }
    script.extend(
        orig_mid[orig_idx..]
            .iter()
            .map(|t| DiffToken::new(DiffTag::Removed, t)),
    );
    script.extend(
        mod_mid[mod_idx..]
            .iter()
            .map(|t| DiffToken::new(DiffTag::Added, t)),
    );

    script.extend(
        original[original.len() - suffix..]
            .iter()
            .map(|t| DiffToken::new(DiffTag::Unchanged, t)),
    );
    script
}

/// Index pairs of one longest common subsequence, in order
///
/// Hirschberg's divide and conquer: memory stays linear in the length of
/// `modified` while time stays `O(n * m)`.
fn longest_common_subsequence(original: &[&str], modified: &[&str]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    collect_lcs(original, modified, 0, 0, &mut pairs);
    pairs
}

fn collect_lcs(
    original: &[&str],
    modified: &[&str],
    orig_offset: usize,
    mod_offset: usize,
    pairs: &mut Vec<(usize, usize)>,
) {
    if original.is_empty() || modified.is_empty() {
        return;
    }
    if original.len() == 1 {
        if let Some(j) = modified.iter().position(|t| *t == original[0]) {
            pairs.push((orig_offset, mod_offset + j));
        }
        return;
    }

    let mid = original.len() / 2;
    let forward = lcs_lengths(original[..mid].iter(), modified.iter());
    let backward = lcs_lengths(original[mid..].iter().rev(), modified.iter().rev());

    // forward[j] covers modified[..j], backward[k] covers the last k tokens
    let m = modified.len();
    let mut split = 0;
    let mut best = 0;
    for j in 0..=m {
        let total = forward[j] + backward[m - j];
        if total > best {
            best = total;
            split = j;
        }
    }

    collect_lcs(&original[..mid], &modified[..split], orig_offset, mod_offset, pairs);
    collect_lcs(
        &original[mid..],
        &modified[split..],
        orig_offset + mid,
        mod_offset + split,
        pairs,
    );
}

/// Last row of the LCS length table: entry `j` is the LCS length of all of
/// `original` against the first `j` tokens of `modified`
fn lcs_lengths<'a, T, A, B>(original: A, modified: B) -> Vec<u32>
where
    T: PartialEq + 'a,
    A: Iterator<Item = &'a T>,
    B: Iterator<Item = &'a T> + Clone,
{
    let width = modified.clone().count() + 1;
    let mut prev = vec![0u32; width];
    let mut curr = vec![0u32; width];
    for a in original {
        for (j, b) in modified.clone().enumerate() {
            curr[j + 1] = if a == b {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev
}

/// First longest run of consecutive `Unchanged` entries
fn longest_unchanged_run(script: &[DiffToken]) -> Option<String> {
    let mut best: &[DiffToken] = &[];
    let mut start = 0;
    for (i, token) in script.iter().enumerate() {
        if token.tag != DiffTag::Unchanged {
            start = i + 1;
            continue;
        }
        if i + 1 - start > best.len() {
            best = &script[start..=i];
        }
    }
    if best.is_empty() {
        None
    } else {
        Some(
            best.iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
