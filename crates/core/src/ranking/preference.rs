//! Preference (suitability) scoring.
//!
//! Scores one catalog entry against a user profile from four sub-scores:
//! price fit of the best offer, specification tiers for the use case,
//! store trust, and recency-weighted behavioral affinity. An entry with
//! no offers is hard-disqualified to suitability 0; every other oddity
//! (corrupt price, out-of-range rating) degrades only the sub-score it
//! feeds.

use chrono::{DateTime, Utc};

use crate::config::RankingConfig;
use crate::domain::{BudgetRange, CatalogEntry, InteractionKind, KeySpecs, Offer, UseCase};
use crate::ranking::types::SubScores;

// Specification tiers. Discrete buckets, not interpolation: a 11.9GB RAM
// reading is mid tier, full stop.
const RAM_HIGH_GB: u32 = 12;
const RAM_MID_GB: u32 = 8;
const REFRESH_HIGH_HZ: u32 = 120;
const CAMERA_HIGH_MP: u32 = 100;
const CAMERA_MID_MP: u32 = 48;
const BATTERY_HIGH_MAH: u32 = 5000;
const BATTERY_MID_MAH: u32 = 4000;

const GAMING_RAM_SHARE: f64 = 0.7;
const GAMING_REFRESH_SHARE: f64 = 0.3;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Suitability of one entry, with the sub-score breakdown and the figures
/// of the selected best offer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Suitability {
    /// Weighted sum of the sub-scores, rounded to 2 decimals, in [0, 1].
    pub score: f64,
    pub breakdown: SubScores,
    pub best_net_price: Option<f64>,
    pub best_rating: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct PreferenceScorer<'a> {
    config: &'a RankingConfig,
}

impl<'a> PreferenceScorer<'a> {
    pub fn new(config: &'a RankingConfig) -> Self {
        Self { config }
    }

    /// Score `entry` for `profile` at the given instant. `now` is passed
    /// explicitly so batch scoring is deterministic under one clock.
    pub fn suitability(
        &self,
        entry: &CatalogEntry,
        profile: &crate::domain::UserProfile,
        now: DateTime<Utc>,
    ) -> Suitability {
        // Zero offers is the one hard disqualification; no other
        // sub-score is computed.
        let Some((best_offer, best_net)) = select_best_offer(&entry.offers) else {
            return Suitability::default();
        };

        let breakdown = SubScores {
            price: best_net
                .map(|net| self.price_score(net, &profile.budget))
                .unwrap_or(0.0),
            specs: self.spec_score(&entry.specs, profile.use_case),
            trust: self.trust_score(best_offer),
            behavior: self.behavior_score(&profile.interactions, entry, now),
        };

        let table = self.config.table_for(profile.priority);
        let weighted = table.price * breakdown.price
            + table.specs * breakdown.specs
            + table.trust * breakdown.trust
            + table.behavior * breakdown.behavior;

        Suitability {
            score: round2(weighted.clamp(0.0, 1.0)),
            breakdown,
            best_net_price: best_net,
            best_rating: valid_rating(best_offer),
        }
    }

    /// Piecewise price fit: 1.0 at or below the budget floor, 0.0 at or
    /// beyond the overshoot cut-off, linear penalty with a floor in between.
    fn price_score(&self, net_price: f64, budget: &BudgetRange) -> f64 {
        if !budget.min.is_finite() || !budget.max.is_finite() {
            return 0.0;
        }
        if net_price <= budget.min {
            return 1.0;
        }
        if net_price >= budget.max * self.config.price.overshoot_factor {
            return 0.0;
        }

        let range = budget.max - budget.min;
        let divisor = if range > 0.0 { range } else { 1.0 };
        let penalty = (net_price - budget.min) / divisor * self.config.price.slope;
        (1.0 - penalty).max(self.config.price.floor)
    }

    fn spec_score(&self, specs: &KeySpecs, use_case: UseCase) -> f64 {
        match use_case {
            UseCase::Gaming => {
                let ram_tier = if specs.ram_gb >= RAM_HIGH_GB {
                    1.0
                } else if specs.ram_gb >= RAM_MID_GB {
                    0.6
                } else {
                    0.3
                };
                // Absent refresh rate is the low tier.
                let refresh_tier = match specs.refresh_rate_hz {
                    Some(hz) if hz >= REFRESH_HIGH_HZ => 1.0,
                    _ => 0.4,
                };
                ram_tier * GAMING_RAM_SHARE + refresh_tier * GAMING_REFRESH_SHARE
            }
            UseCase::Camera => {
                if specs.camera_mp >= CAMERA_HIGH_MP {
                    1.0
                } else if specs.camera_mp >= CAMERA_MID_MP {
                    0.8
                } else {
                    0.4
                }
            }
            UseCase::Everyday => {
                if specs.battery_mah >= BATTERY_HIGH_MAH {
                    1.0
                } else if specs.battery_mah >= BATTERY_MID_MAH {
                    0.7
                } else {
                    0.4
                }
            }
        }
    }

    /// Rating quality, volume confidence, and verification bonus, capped
    /// at 1.0. A missing or out-of-range rating contributes 0 quality.
    fn trust_score(&self, offer: &Offer) -> f64 {
        let trust = &self.config.trust;
        let quality = valid_rating(offer).map(|rating| rating / 5.0).unwrap_or(0.0);
        let volume = (f64::from(offer.rating_count) / trust.volume_cap).min(1.0);
        let bonus = if offer.is_verified { trust.verification_bonus } else { 0.0 };

        (trust.rating_weight * quality + trust.volume_weight * volume + bonus).min(1.0)
    }

    /// Recency- and kind-weighted affinity toward the entry's brand and
    /// category. Empty history returns the neutral prior.
    fn behavior_score(
        &self,
        interactions: &[crate::domain::Interaction],
        entry: &CatalogEntry,
        now: DateTime<Utc>,
    ) -> f64 {
        let behavior = &self.config.behavior;
        if interactions.is_empty() {
            return behavior.neutral_prior;
        }

        let mut affinity = 0.0;
        let mut total_weight = 0.0;

        for interaction in interactions {
            let days_since =
                ((now - interaction.at).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
            let decay = (-behavior.recency_decay * days_since).exp();
            let weight = self.kind_weight(interaction.kind) * decay;

            if interaction.brand.eq_ignore_ascii_case(&entry.brand) {
                affinity += weight;
            }
            if interaction.category.eq_ignore_ascii_case(&entry.category) {
                affinity += behavior.category_factor * weight;
            }
            total_weight += weight;
        }

        if total_weight > 0.0 {
            (behavior.neutral_prior + affinity / total_weight).min(1.0)
        } else {
            behavior.neutral_prior
        }
    }

    fn kind_weight(&self, kind: InteractionKind) -> f64 {
        let behavior = &self.config.behavior;
        match kind {
            InteractionKind::Purchase => behavior.purchase_weight,
            InteractionKind::Wishlist => behavior.wishlist_weight,
            InteractionKind::Click => behavior.click_weight,
            InteractionKind::View => behavior.view_weight,
        }
    }
}

/// The offer minimizing net price among offers with a finite, non-negative
/// net price. When no offer qualifies, the first offer is still returned
/// (its trust signals remain usable) with no net price.
fn select_best_offer(offers: &[Offer]) -> Option<(&Offer, Option<f64>)> {
    let mut best: Option<(&Offer, f64)> = None;
    for offer in offers {
        let net = offer.net_price();
        if !net.is_finite() || net < 0.0 {
            continue;
        }
        match best {
            Some((_, current)) if current <= net => {}
            _ => best = Some((offer, net)),
        }
    }

    match best {
        Some((offer, net)) => Some((offer, Some(net))),
        None => offers.first().map(|offer| (offer, None)),
    }
}

fn valid_rating(offer: &Offer) -> Option<f64> {
    offer.rating_average.filter(|rating| rating.is_finite() && (1.0..=5.0).contains(rating))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
