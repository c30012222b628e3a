//! Ranking combiner: the two host-facing entry points.
//!
//! Recommendation mode ranks by suitability alone; search mode blends
//! text relevance with suitability, drops below-threshold noise, and
//! sorts by the caller's key. Both are pure functions of their inputs
//! plus a clock captured once per call, with identifier tie-breaks for a
//! total, reproducible order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::config::RankingConfig;
use crate::domain::{CatalogEntry, UserProfile};
use crate::errors::DomainError;
use crate::ranking::preference::{PreferenceScorer, Suitability};
use crate::ranking::types::{RankedResult, SortKey, SubScores};
use crate::text::{FieldMatcher, TextNormalizer};

const REASON_NO_OFFERS: &str = "No active offers right now.";
const REASON_PRICE: &str = "Strong fit for your budget.";
const REASON_SPECS: &str = "Specs line up with your use case.";
const REASON_TRUST: &str = "Highly rated by trusted stores.";
const REASON_BEHAVIOR: &str = "Close to brands you shop for.";

#[derive(Clone, Debug)]
pub struct RankingEngine {
    config: RankingConfig,
    matcher: FieldMatcher,
}

impl RankingEngine {
    /// Build an engine from a configuration, rejecting one whose weight
    /// tables or thresholds are structurally invalid.
    pub fn new(config: RankingConfig) -> Result<Self, DomainError> {
        config.validate().map_err(|error| DomainError::InvalidInput(error.to_string()))?;
        Ok(Self::from_validated(config))
    }

    /// Engine with the built-in production defaults.
    pub fn with_defaults() -> Self {
        Self::from_validated(RankingConfig::default())
    }

    fn from_validated(config: RankingConfig) -> Self {
        let normalizer = TextNormalizer::new(&config.aliases);
        let matcher = FieldMatcher::new(normalizer, config.fields, config.fuzzy);
        Self { config, matcher }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank the catalog by suitability for this profile, best first.
    pub fn recommend(&self, entries: &[CatalogEntry], profile: &UserProfile) -> Vec<RankedResult> {
        self.recommend_at(entries, profile, Utc::now())
    }

    /// `recommend` with an explicit clock, for deterministic replay.
    pub fn recommend_at(
        &self,
        entries: &[CatalogEntry],
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Vec<RankedResult> {
        let scorer = PreferenceScorer::new(&self.config);
        let mut results: Vec<RankedResult> = entries
            .iter()
            .map(|entry| build_result(entry, None, None, scorer.suitability(entry, profile, now)))
            .collect();

        results.sort_by(|a, b| {
            descending(a.suitability, b.suitability).then_with(|| a.entry_id.cmp(&b.entry_id))
        });
        results
    }

    /// Rank the catalog against a text query, dropping entries whose
    /// relevance is at or below the configured cutoff.
    pub fn search(
        &self,
        query: &str,
        entries: &[CatalogEntry],
        profile: &UserProfile,
        sort_key: SortKey,
    ) -> Vec<RankedResult> {
        self.search_at(query, entries, profile, sort_key, Utc::now())
    }

    /// `search` with an explicit clock, for deterministic replay.
    pub fn search_at(
        &self,
        query: &str,
        entries: &[CatalogEntry],
        profile: &UserProfile,
        sort_key: SortKey,
        now: DateTime<Utc>,
    ) -> Vec<RankedResult> {
        let search = &self.config.search;
        let scorer = PreferenceScorer::new(&self.config);

        let mut results: Vec<RankedResult> = entries
            .iter()
            .filter_map(|entry| {
                let relevance = self.matcher.match_score(query, entry);
                if relevance <= search.relevance_cutoff {
                    return None;
                }
                let suitability = scorer.suitability(entry, profile, now);
                let combined = search.relevance_weight * relevance
                    + search.suitability_weight * suitability.score;
                Some(build_result(entry, Some(relevance), Some(combined), suitability))
            })
            .collect();

        results.sort_by(|a, b| compare_by_key(a, b, sort_key));
        results
    }
}

fn build_result(
    entry: &CatalogEntry,
    relevance: Option<f64>,
    combined: Option<f64>,
    suitability: Suitability,
) -> RankedResult {
    let reason = placeholder_reason(&suitability.breakdown, !entry.offers.is_empty());
    RankedResult {
        entry_id: entry.id.clone(),
        name: entry.name.clone(),
        relevance,
        suitability: suitability.score,
        combined,
        best_net_price: suitability.best_net_price,
        best_rating: suitability.best_rating,
        breakdown: suitability.breakdown,
        reason,
    }
}

/// Canned one-liner keyed on the dominant sub-score. The host's
/// explanation service replaces it after ranking; results stay
/// displayable in the meantime.
fn placeholder_reason(breakdown: &SubScores, has_offers: bool) -> String {
    if !has_offers {
        return REASON_NO_OFFERS.to_string();
    }

    let mut best = (breakdown.price, REASON_PRICE);
    for candidate in [
        (breakdown.specs, REASON_SPECS),
        (breakdown.trust, REASON_TRUST),
        (breakdown.behavior, REASON_BEHAVIOR),
    ] {
        if candidate.0 > best.0 {
            best = candidate;
        }
    }
    best.1.to_string()
}

fn compare_by_key(a: &RankedResult, b: &RankedResult, sort_key: SortKey) -> Ordering {
    let primary = match sort_key {
        SortKey::Combined => {
            descending(a.combined.unwrap_or(0.0), b.combined.unwrap_or(0.0))
        }
        SortKey::NetPriceAsc => ascending(
            a.best_net_price.unwrap_or(f64::INFINITY),
            b.best_net_price.unwrap_or(f64::INFINITY),
        ),
        SortKey::RatingDesc => {
            descending(a.best_rating.unwrap_or(0.0), b.best_rating.unwrap_or(0.0))
        }
    };
    primary.then_with(|| a.entry_id.cmp(&b.entry_id))
}

fn ascending(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::{BudgetRange, EntryId, KeySpecs, Offer, PriorityMode, UseCase};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn offer(price: f64, rating: f64) -> Offer {
        Offer {
            price,
            shipping_cost: 0.0,
            coupons: Vec::new(),
            rating_average: Some(rating),
            rating_count: 900,
            is_verified: true,
        }
    }

    fn phone(id: &str, name: &str, price: f64, rating: f64) -> CatalogEntry {
        CatalogEntry {
            id: EntryId(id.to_string()),
            name: name.to_string(),
            brand: "Apple".to_string(),
            category: "phones".to_string(),
            tags: vec!["flagship".to_string()],
            specs: KeySpecs {
                storage_gb: 256,
                ram_gb: 8,
                camera_mp: 48,
                battery_mah: 4441,
                screen_size_inch: 6.7,
                refresh_rate_hz: Some(120),
            },
            offers: vec![offer(price, rating)],
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            budget: BudgetRange { min: 2000.0, max: 5000.0 },
            preferred_brands: Vec::new(),
            priority: PriorityMode::Balanced,
            use_case: UseCase::Everyday,
            interactions: Vec::new(),
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut config = RankingConfig::default();
        config.weights.balanced.price = 0.9;
        assert!(matches!(RankingEngine::new(config), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn recommendation_sorts_by_suitability_then_id() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![
            phone("b", "Phone B", 3500.0, 4.5),
            phone("a", "Phone A", 3000.0, 4.5),
            phone("c", "Phone C", 3000.0, 4.5),
        ];

        let ranked = engine.recommend_at(&entries, &profile(), now());
        assert_eq!(ranked.len(), 3);
        // a and c tie exactly; identifier breaks the tie ascending.
        assert_eq!(ranked[0].entry_id, EntryId("a".to_string()));
        assert_eq!(ranked[1].entry_id, EntryId("c".to_string()));
        assert_eq!(ranked[2].entry_id, EntryId("b".to_string()));
        assert!(ranked[0].relevance.is_none());
        assert!(ranked[0].combined.is_none());
    }

    #[test]
    fn tie_break_is_reproducible_across_runs() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![
            phone("z", "Same Phone", 3000.0, 4.5),
            phone("m", "Same Phone", 3000.0, 4.5),
            phone("a", "Same Phone", 3000.0, 4.5),
        ];

        let first = engine.recommend_at(&entries, &profile(), now());
        for _ in 0..10 {
            assert_eq!(engine.recommend_at(&entries, &profile(), now()), first);
        }
        let ids: Vec<&str> = first.iter().map(|r| r.entry_id.0.as_str()).collect();
        assert_eq!(ids, ["a", "m", "z"]);
    }

    #[test]
    fn entries_without_offers_never_win() {
        let engine = RankingEngine::with_defaults();
        let mut bare = phone("bare", "Offerless Phone", 0.0, 4.5);
        bare.offers.clear();
        let entries = vec![bare, phone("live", "Phone", 3000.0, 4.5)];

        let ranked = engine.recommend_at(&entries, &profile(), now());
        assert_eq!(ranked[0].entry_id, EntryId("live".to_string()));
        assert_eq!(ranked[1].suitability, 0.0);
        assert_eq!(ranked[1].reason, "No active offers right now.");
    }

    #[test]
    fn search_filters_below_relevance_cutoff() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![
            phone("i15", "Apple iPhone 15 Pro Max 256GB", 4999.0, 4.8),
            phone("s24", "Samsung Galaxy S24 Ultra 512GB", 4500.0, 4.9),
        ];

        let hits = engine.search_at("laptop", &entries, &profile(), SortKey::Combined, now());
        assert!(hits.is_empty());
    }

    #[test]
    fn search_combines_relevance_and_suitability() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![phone("i15", "Apple iPhone 15 Pro Max 256GB", 4999.0, 4.8)];

        let hits = engine.search_at("iphone", &entries, &profile(), SortKey::Combined, now());
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        let relevance = hit.relevance.expect("search mode sets relevance");
        assert_eq!(relevance, 1.0);
        let expected = 0.7 * relevance + 0.3 * hit.suitability;
        assert!((hit.combined.expect("search mode sets combined") - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![phone("i15", "Apple iPhone 15 Pro Max 256GB", 4999.0, 4.8)];
        assert!(engine.search_at("", &entries, &profile(), SortKey::Combined, now()).is_empty());
        assert!(engine.search_at("  ", &entries, &profile(), SortKey::Combined, now()).is_empty());
    }

    #[test]
    fn sort_keys_reorder_search_results() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![
            phone("pricey", "Phone Alpha", 4800.0, 4.9),
            phone("cheap", "Phone Beta", 2500.0, 4.2),
        ];

        let by_price = engine.search_at("phone", &entries, &profile(), SortKey::NetPriceAsc, now());
        assert_eq!(by_price[0].entry_id, EntryId("cheap".to_string()));

        let by_rating = engine.search_at("phone", &entries, &profile(), SortKey::RatingDesc, now());
        assert_eq!(by_rating[0].entry_id, EntryId("pricey".to_string()));
    }

    #[test]
    fn arabic_query_reaches_latin_catalog() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![
            phone("i15", "Apple iPhone 15 Pro Max 256GB", 4999.0, 4.8),
            phone("s24", "Samsung Galaxy S24 Ultra 512GB", 4500.0, 4.9),
        ];

        let hits = engine.search_at("ايفون", &entries, &profile(), SortKey::Combined, now());
        assert_eq!(hits[0].entry_id, EntryId("i15".to_string()));
        assert!(hits[0].relevance.unwrap() > 0.8);
        // The transliterated token also fuzzy-matches "phones" in the
        // other entry's category, so it may survive the cutoff, but only
        // at a fraction of the direct name hit.
        for other in &hits[1..] {
            assert!(other.relevance.unwrap() < 0.3);
        }
    }

    #[test]
    fn placeholder_reason_tracks_the_dominant_subscore() {
        let strong_price = SubScores { price: 0.9, specs: 0.2, trust: 0.3, behavior: 0.1 };
        assert_eq!(placeholder_reason(&strong_price, true), REASON_PRICE);
        let strong_trust = SubScores { price: 0.1, specs: 0.2, trust: 0.9, behavior: 0.1 };
        assert_eq!(placeholder_reason(&strong_trust, true), REASON_TRUST);
        assert_eq!(placeholder_reason(&SubScores::default(), false), REASON_NO_OFFERS);
    }

    #[test]
    fn results_carry_breakdown_and_placeholder_reason() {
        let engine = RankingEngine::with_defaults();
        let entries = vec![phone("i15", "Apple iPhone 15 Pro Max 256GB", 2100.0, 4.8)];

        let ranked = engine.recommend_at(&entries, &profile(), now());
        let result = &ranked[0];
        assert!(result.breakdown.price > 0.9);
        assert!(!result.reason.is_empty());
        assert_eq!(result.best_net_price, Some(2100.0));
        assert_eq!(result.best_rating, Some(4.8));
    }
}
