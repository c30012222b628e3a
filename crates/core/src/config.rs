//! Ranking configuration.
//!
//! Every empirically tuned constant in the engine lives here as a named
//! field with the production default, so catalogs with different noise
//! characteristics can recalibrate without code changes. Loading is
//! layered: built-in defaults, then an optional TOML patch file, then
//! `SHOPMATCH_*` environment overrides, then programmatic overrides.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub search: SearchConfig,
    pub fields: FieldWeights,
    pub fuzzy: FuzzyConfig,
    pub price: PriceConfig,
    pub trust: TrustConfig,
    pub behavior: BehaviorConfig,
    pub weights: PriorityTables,
    /// Transliteration aliases applied token-wise after canonicalization.
    /// Keys are canonical query tokens, values canonical replacements.
    pub aliases: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Entries with relevance at or below this are dropped from search results.
    pub relevance_cutoff: f64,
    pub relevance_weight: f64,
    pub suitability_weight: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub name: f64,
    pub brand: f64,
    pub category: f64,
    pub tag: f64,
    /// Applied on top of the field weight when a token only fuzzy-matches.
    pub fuzzy_discount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Queries up to this many chars get zero edit-distance tolerance.
    pub short_max_chars: usize,
    /// Queries up to this many chars get tolerance 1.
    pub medium_max_chars: usize,
    /// Tolerance for longer queries when the caller supplies no hint.
    pub default_tolerance: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceConfig {
    /// Net prices above budget.max * overshoot_factor score 0.
    pub overshoot_factor: f64,
    /// Slope of the linear penalty inside the budget range.
    pub slope: f64,
    /// In-range scores never drop below this floor.
    pub floor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    pub rating_weight: f64,
    pub volume_weight: f64,
    pub verification_bonus: f64,
    /// Rating counts at or above this earn the full volume contribution.
    pub volume_cap: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Exponential decay rate per day of interaction age.
    pub recency_decay: f64,
    pub purchase_weight: f64,
    pub wishlist_weight: f64,
    pub click_weight: f64,
    pub view_weight: f64,
    /// Affinity credited for a category match, relative to a brand match.
    pub category_factor: f64,
    /// Score used when the interaction history is empty.
    pub neutral_prior: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorityTables {
    pub balanced: WeightTable,
    pub price_first: WeightTable,
    pub quality_first: WeightTable,
}

/// Sub-score weights for one priority mode. Must sum to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub price: f64,
    pub specs: f64,
    pub trust: f64,
    pub behavior: f64,
}

impl WeightTable {
    pub fn sum(&self) -> f64 {
        self.price + self.specs + self.trust + self.behavior
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub relevance_cutoff: Option<f64>,
    pub default_tolerance: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                relevance_cutoff: 0.15,
                relevance_weight: 0.7,
                suitability_weight: 0.3,
            },
            fields: FieldWeights {
                name: 1.0,
                brand: 0.6,
                category: 0.4,
                tag: 0.5,
                fuzzy_discount: 0.8,
            },
            fuzzy: FuzzyConfig { short_max_chars: 3, medium_max_chars: 5, default_tolerance: 2 },
            price: PriceConfig { overshoot_factor: 1.2, slope: 0.7, floor: 0.1 },
            trust: TrustConfig {
                rating_weight: 0.6,
                volume_weight: 0.2,
                verification_bonus: 0.2,
                volume_cap: 500.0,
            },
            behavior: BehaviorConfig {
                recency_decay: 0.1,
                purchase_weight: 1.0,
                wishlist_weight: 0.7,
                click_weight: 0.3,
                view_weight: 0.1,
                category_factor: 0.5,
                neutral_prior: 0.5,
            },
            weights: PriorityTables {
                balanced: WeightTable { price: 0.35, specs: 0.25, trust: 0.20, behavior: 0.20 },
                price_first: WeightTable { price: 0.6, specs: 0.1, trust: 0.1, behavior: 0.2 },
                quality_first: WeightTable { price: 0.1, specs: 0.5, trust: 0.25, behavior: 0.15 },
            },
            aliases: default_aliases(),
        }
    }
}

/// Common Arabic transliterations of catalog terms. These make Arabic
/// queries land on Latin-script catalog fields.
fn default_aliases() -> BTreeMap<String, String> {
    [
        ("ايفون", "iphone"),
        ("ابل", "apple"),
        ("سامسونج", "samsung"),
        ("جالكسي", "galaxy"),
        ("جوال", "phone"),
        ("هاتف", "phone"),
        ("لابتوب", "laptop"),
        ("كاميرا", "camera"),
        ("برو", "pro"),
        ("ماكس", "max"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

impl RankingConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shopmatch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(search) = patch.search {
            if let Some(relevance_cutoff) = search.relevance_cutoff {
                self.search.relevance_cutoff = relevance_cutoff;
            }
            if let Some(relevance_weight) = search.relevance_weight {
                self.search.relevance_weight = relevance_weight;
            }
            if let Some(suitability_weight) = search.suitability_weight {
                self.search.suitability_weight = suitability_weight;
            }
        }

        if let Some(fields) = patch.fields {
            if let Some(name) = fields.name {
                self.fields.name = name;
            }
            if let Some(brand) = fields.brand {
                self.fields.brand = brand;
            }
            if let Some(category) = fields.category {
                self.fields.category = category;
            }
            if let Some(tag) = fields.tag {
                self.fields.tag = tag;
            }
            if let Some(fuzzy_discount) = fields.fuzzy_discount {
                self.fields.fuzzy_discount = fuzzy_discount;
            }
        }

        if let Some(fuzzy) = patch.fuzzy {
            if let Some(short_max_chars) = fuzzy.short_max_chars {
                self.fuzzy.short_max_chars = short_max_chars;
            }
            if let Some(medium_max_chars) = fuzzy.medium_max_chars {
                self.fuzzy.medium_max_chars = medium_max_chars;
            }
            if let Some(default_tolerance) = fuzzy.default_tolerance {
                self.fuzzy.default_tolerance = default_tolerance;
            }
        }

        if let Some(price) = patch.price {
            if let Some(overshoot_factor) = price.overshoot_factor {
                self.price.overshoot_factor = overshoot_factor;
            }
            if let Some(slope) = price.slope {
                self.price.slope = slope;
            }
            if let Some(floor) = price.floor {
                self.price.floor = floor;
            }
        }

        if let Some(trust) = patch.trust {
            if let Some(rating_weight) = trust.rating_weight {
                self.trust.rating_weight = rating_weight;
            }
            if let Some(volume_weight) = trust.volume_weight {
                self.trust.volume_weight = volume_weight;
            }
            if let Some(verification_bonus) = trust.verification_bonus {
                self.trust.verification_bonus = verification_bonus;
            }
            if let Some(volume_cap) = trust.volume_cap {
                self.trust.volume_cap = volume_cap;
            }
        }

        if let Some(behavior) = patch.behavior {
            if let Some(recency_decay) = behavior.recency_decay {
                self.behavior.recency_decay = recency_decay;
            }
            if let Some(purchase_weight) = behavior.purchase_weight {
                self.behavior.purchase_weight = purchase_weight;
            }
            if let Some(wishlist_weight) = behavior.wishlist_weight {
                self.behavior.wishlist_weight = wishlist_weight;
            }
            if let Some(click_weight) = behavior.click_weight {
                self.behavior.click_weight = click_weight;
            }
            if let Some(view_weight) = behavior.view_weight {
                self.behavior.view_weight = view_weight;
            }
            if let Some(category_factor) = behavior.category_factor {
                self.behavior.category_factor = category_factor;
            }
            if let Some(neutral_prior) = behavior.neutral_prior {
                self.behavior.neutral_prior = neutral_prior;
            }
        }

        if let Some(weights) = patch.weights {
            if let Some(balanced) = weights.balanced {
                self.weights.balanced = balanced;
            }
            if let Some(price_first) = weights.price_first {
                self.weights.price_first = price_first;
            }
            if let Some(quality_first) = weights.quality_first {
                self.weights.quality_first = quality_first;
            }
        }

        if let Some(aliases) = patch.aliases {
            self.aliases.extend(aliases);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPMATCH_RELEVANCE_CUTOFF") {
            self.search.relevance_cutoff = parse_f64("SHOPMATCH_RELEVANCE_CUTOFF", &value)?;
        }
        if let Some(value) = read_env("SHOPMATCH_DEFAULT_TOLERANCE") {
            self.fuzzy.default_tolerance = parse_usize("SHOPMATCH_DEFAULT_TOLERANCE", &value)?;
        }
        if let Some(value) = read_env("SHOPMATCH_PRICE_OVERSHOOT") {
            self.price.overshoot_factor = parse_f64("SHOPMATCH_PRICE_OVERSHOOT", &value)?;
        }
        if let Some(value) = read_env("SHOPMATCH_PRICE_FLOOR") {
            self.price.floor = parse_f64("SHOPMATCH_PRICE_FLOOR", &value)?;
        }
        if let Some(value) = read_env("SHOPMATCH_RECENCY_DECAY") {
            self.behavior.recency_decay = parse_f64("SHOPMATCH_RECENCY_DECAY", &value)?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(relevance_cutoff) = overrides.relevance_cutoff {
            self.search.relevance_cutoff = relevance_cutoff;
        }
        if let Some(default_tolerance) = overrides.default_tolerance {
            self.fuzzy.default_tolerance = default_tolerance;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weight_table("weights.balanced", &self.weights.balanced)?;
        validate_weight_table("weights.price_first", &self.weights.price_first)?;
        validate_weight_table("weights.quality_first", &self.weights.quality_first)?;

        let combined = self.search.relevance_weight + self.search.suitability_weight;
        if (combined - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::Validation(format!(
                "search.relevance_weight + search.suitability_weight must sum to 1.0, got {combined}"
            )));
        }
        if !(0.0..=1.0).contains(&self.search.relevance_cutoff) {
            return Err(ConfigError::Validation(
                "search.relevance_cutoff must be in range 0.0..=1.0".to_string(),
            ));
        }

        if self.fuzzy.short_max_chars > self.fuzzy.medium_max_chars {
            return Err(ConfigError::Validation(
                "fuzzy.short_max_chars must not exceed fuzzy.medium_max_chars".to_string(),
            ));
        }

        for (key, value) in [
            ("fields.name", self.fields.name),
            ("fields.brand", self.fields.brand),
            ("fields.category", self.fields.category),
            ("fields.tag", self.fields.tag),
            ("fields.fuzzy_discount", self.fields.fuzzy_discount),
            ("price.slope", self.price.slope),
            ("price.floor", self.price.floor),
            ("behavior.neutral_prior", self.behavior.neutral_prior),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be in range 0.0..=1.0, got {value}"
                )));
            }
        }

        if self.price.overshoot_factor < 1.0 || !self.price.overshoot_factor.is_finite() {
            return Err(ConfigError::Validation(
                "price.overshoot_factor must be a finite value >= 1.0".to_string(),
            ));
        }

        if self.trust.volume_cap <= 0.0 || !self.trust.volume_cap.is_finite() {
            return Err(ConfigError::Validation(
                "trust.volume_cap must be a finite value > 0".to_string(),
            ));
        }

        if self.behavior.recency_decay < 0.0 || !self.behavior.recency_decay.is_finite() {
            return Err(ConfigError::Validation(
                "behavior.recency_decay must be a finite value >= 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Weight table for the given priority mode.
    pub fn table_for(&self, priority: crate::domain::PriorityMode) -> &WeightTable {
        use crate::domain::PriorityMode;
        match priority {
            PriorityMode::PriceFirst => &self.weights.price_first,
            PriorityMode::QualityFirst => &self.weights.quality_first,
            PriorityMode::Balanced => &self.weights.balanced,
        }
    }
}

impl FuzzyConfig {
    /// Length-scaled edit-distance tolerance for a query of `query_chars`
    /// characters. A caller-supplied hint replaces the long-query default.
    pub fn tolerance_for(&self, query_chars: usize, hint: Option<usize>) -> usize {
        if query_chars <= self.short_max_chars {
            0
        } else if query_chars <= self.medium_max_chars {
            1
        } else {
            hint.unwrap_or(self.default_tolerance)
        }
    }
}

fn validate_weight_table(name: &str, table: &WeightTable) -> Result<(), ConfigError> {
    for (field, value) in [
        ("price", table.price),
        ("specs", table.specs),
        ("trust", table.trust),
        ("behavior", table.behavior),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{name}.{field} must be in range 0.0..=1.0, got {value}"
            )));
        }
    }

    let sum = table.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(ConfigError::Validation(format!("{name} must sum to 1.0, got {sum}")));
    }
    Ok(())
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shopmatch.toml"), PathBuf::from("config/shopmatch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    search: Option<SearchPatch>,
    fields: Option<FieldsPatch>,
    fuzzy: Option<FuzzyPatch>,
    price: Option<PricePatch>,
    trust: Option<TrustPatch>,
    behavior: Option<BehaviorPatch>,
    weights: Option<WeightsPatch>,
    aliases: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPatch {
    relevance_cutoff: Option<f64>,
    relevance_weight: Option<f64>,
    suitability_weight: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FieldsPatch {
    name: Option<f64>,
    brand: Option<f64>,
    category: Option<f64>,
    tag: Option<f64>,
    fuzzy_discount: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FuzzyPatch {
    short_max_chars: Option<usize>,
    medium_max_chars: Option<usize>,
    default_tolerance: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct PricePatch {
    overshoot_factor: Option<f64>,
    slope: Option<f64>,
    floor: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct TrustPatch {
    rating_weight: Option<f64>,
    volume_weight: Option<f64>,
    verification_bonus: Option<f64>,
    volume_cap: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct BehaviorPatch {
    recency_decay: Option<f64>,
    purchase_weight: Option<f64>,
    wishlist_weight: Option<f64>,
    click_weight: Option<f64>,
    view_weight: Option<f64>,
    category_factor: Option<f64>,
    neutral_prior: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    balanced: Option<WeightTable>,
    price_first: Option<WeightTable>,
    quality_first: Option<WeightTable>,
}
