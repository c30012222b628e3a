//! Query-to-entry relevance scoring.
//!
//! Each query token is scored against the entry's searchable fields and
//! the best per-token score is kept: full field weight for substring
//! containment, a discounted similarity-scaled weight for fuzzy matches
//! within tolerance, zero otherwise.

use crate::config::{FieldWeights, FuzzyConfig};
use crate::domain::CatalogEntry;
use crate::text::distance::{levenshtein, similarity_ratio};
use crate::text::normalize::TextNormalizer;

const MIN_TOKEN_CHARS: usize = 2;

#[derive(Clone, Debug)]
pub struct FieldMatcher {
    normalizer: TextNormalizer,
    fields: FieldWeights,
    fuzzy: FuzzyConfig,
}

impl FieldMatcher {
    pub fn new(normalizer: TextNormalizer, fields: FieldWeights, fuzzy: FuzzyConfig) -> Self {
        Self { normalizer, fields, fuzzy }
    }

    /// Relevance of `query` against the entry's name, brand, category, and
    /// tags, in [0, 1]. Empty or whitespace-only queries score 0.
    pub fn match_score(&self, query: &str, entry: &CatalogEntry) -> f64 {
        let query = self.normalizer.normalize(query);
        let tokens: Vec<&str> = query.split_whitespace().collect();
        if tokens.is_empty() {
            return 0.0;
        }

        let mut fields: Vec<(String, f64)> = vec![
            (self.normalizer.normalize(&entry.name), self.fields.name),
            (self.normalizer.normalize(&entry.brand), self.fields.brand),
            (self.normalizer.normalize(&entry.category), self.fields.category),
        ];
        for tag in &entry.tags {
            fields.push((self.normalizer.normalize(tag), self.fields.tag));
        }

        let mut total = 0.0;
        for token in &tokens {
            if token.chars().count() < MIN_TOKEN_CHARS {
                continue;
            }
            total += self.best_field_score(token, &fields);
        }

        // Short tokens dilute the average rather than disappear from it.
        (total / tokens.len() as f64).clamp(0.0, 1.0)
    }

    fn best_field_score(&self, token: &str, fields: &[(String, f64)]) -> f64 {
        let token_chars = token.chars().count();
        let tolerance = self.fuzzy.tolerance_for(token_chars, None);
        let mut best = 0.0f64;

        for (text, weight) in fields {
            if text.contains(token) {
                best = best.max(*weight);
                continue;
            }

            // Fuzzy check against each word of the field text; near-misses
            // score below containment via the similarity ratio.
            for word in text.split_whitespace() {
                if levenshtein(token, word) <= tolerance {
                    let score = weight * self.fields.fuzzy_discount * similarity_ratio(token, word);
                    best = best.max(score);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingConfig;
    use crate::domain::{CatalogEntry, EntryId, KeySpecs};

    fn matcher() -> FieldMatcher {
        let config = RankingConfig::default();
        FieldMatcher::new(TextNormalizer::new(&config.aliases), config.fields, config.fuzzy)
    }

    fn entry() -> CatalogEntry {
        CatalogEntry {
            id: EntryId("iphone-15-pro-max".to_string()),
            name: "Apple iPhone 15 Pro Max 256GB".to_string(),
            brand: "Apple".to_string(),
            category: "phones".to_string(),
            tags: vec!["camera".to_string(), "flagship".to_string(), "5g".to_string()],
            specs: KeySpecs {
                storage_gb: 256,
                ram_gb: 8,
                camera_mp: 48,
                battery_mah: 4441,
                screen_size_inch: 6.7,
                refresh_rate_hz: Some(120),
            },
            offers: Vec::new(),
        }
    }

    #[test]
    fn name_containment_scores_full_weight() {
        assert_eq!(matcher().match_score("iphone", &entry()), 1.0);
    }

    #[test]
    fn score_is_independent_of_casing() {
        let m = matcher();
        let e = entry();
        let lower = m.match_score("iphone", &e);
        assert_eq!(m.match_score("IPHONE", &e), lower);
        assert_eq!(m.match_score("IpHoNe", &e), lower);
    }

    #[test]
    fn brand_and_tag_matches_score_their_field_weight() {
        let m = matcher();
        let e = entry();
        // "apple" is in both brand (0.6) and name (1.0); name wins.
        assert_eq!(m.match_score("apple", &e), 1.0);
        assert_eq!(m.match_score("flagship", &e), 0.5);
        assert_eq!(m.match_score("5g", &e), 0.5);
    }

    #[test]
    fn substring_containment_scores_at_least_field_weight() {
        let m = matcher();
        let e = entry();
        // Contained in both name ("iphone") and category ("phones").
        assert!(m.match_score("phone", &e) >= 0.4);
        assert!(m.match_score("phones", &e) >= 0.4);
    }

    #[test]
    fn typo_within_tolerance_scores_discounted_similarity() {
        let m = matcher();
        let e = entry();
        let score = m.match_score("iphnoe", &e);
        assert!(score > 0.0 && score < 1.0);
        // 2 edits against a 6-char word: 0.8 * (1 - 2/6) on the name weight.
        assert!((score - 0.8 * (1.0 - 2.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn multi_token_queries_average_best_scores() {
        let m = matcher();
        let e = entry();
        let score = m.match_score("apple iphone", &e);
        assert_eq!(score, 1.0);
        // One matching and one unmatched token: averaged down.
        let diluted = m.match_score("iphone zzzzzz", &e);
        assert!((diluted - 0.5).abs() < 1e-9);
    }

    #[test]
    fn short_tokens_are_skipped_but_still_dilute() {
        let m = matcher();
        let e = entry();
        // "a" is below the token minimum; divisor still counts it.
        let score = m.match_score("a iphone", &e);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_and_symbol_queries_score_zero_or_near_zero() {
        let m = matcher();
        let e = entry();
        assert_eq!(m.match_score("", &e), 0.0);
        assert_eq!(m.match_score("   ", &e), 0.0);
        assert_eq!(m.match_score("@#$%", &e), 0.0);
    }

    #[test]
    fn arabic_transliteration_reaches_latin_name() {
        let m = matcher();
        let e = entry();
        assert!(m.match_score("ايفون", &e) > 0.8);
        assert!(m.match_score("ايفون 15 برو", &e) > 0.9);
    }

    #[test]
    fn unrelated_query_scores_below_cutoff() {
        let m = matcher();
        let e = entry();
        assert!(m.match_score("laptop", &e) <= 0.15);
    }
}
