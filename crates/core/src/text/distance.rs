//! Edit-distance fuzzy matching.
//!
//! Classic dynamic-programming Levenshtein over `char`s with the two-row
//! space optimization. Queries and catalog fields are short strings, so
//! the quadratic time bound is irrelevant in practice.

use crate::config::FuzzyConfig;
use crate::text::normalize::TextNormalizer;

/// Fuzzy-match verdicts over normalized strings.
#[derive(Clone, Debug)]
pub struct EditDistanceMatcher {
    normalizer: TextNormalizer,
    fuzzy: FuzzyConfig,
}

impl EditDistanceMatcher {
    pub fn new(normalizer: TextNormalizer, fuzzy: FuzzyConfig) -> Self {
        Self { normalizer, fuzzy }
    }

    /// Edit distance between the normalized forms of `a` and `b`.
    /// Symmetric, zero exactly when the normalized strings are equal.
    pub fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(&self.normalizer.normalize(a), &self.normalizer.normalize(b))
    }

    /// Whether `target` is close enough to `query` to count as a match.
    ///
    /// Substring containment of the normalized query is an immediate match.
    /// Otherwise the edit distance must stay within a tolerance scaled to
    /// the query length; `tolerance_hint` replaces the long-query default.
    pub fn is_fuzzy_match(&self, query: &str, target: &str, tolerance_hint: Option<usize>) -> bool {
        let query = self.normalizer.normalize(query);
        let target = self.normalizer.normalize(target);

        if target.contains(query.as_str()) {
            return true;
        }

        let tolerance = self.fuzzy.tolerance_for(query.chars().count(), tolerance_hint);
        levenshtein(&query, &target) <= tolerance
    }

    /// Similarity ratio in [0, 1]: `1 - distance / max(len)`. Used to rank
    /// near-misses below exact and substring matches.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        similarity_ratio(&self.normalizer.normalize(a), &self.normalizer.normalize(b))
    }
}

/// Levenshtein distance over chars, unit costs, two-row table.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, &ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// `1 - distance / max(char_len)`, clamped to [0, 1]. Two empty strings
/// are identical, so the ratio is 1.
pub(crate) fn similarity_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    (1.0 - levenshtein(a, b) as f64 / longest as f64).clamp(0.0, 1.0)
}
