//! shopmatch-core: recommendation scoring and fuzzy matching for the
//! shopping-comparison assistant.
//!
//! The engine is a pure function of (catalog snapshot, query, user
//! profile) → ranked results. It performs no I/O, holds no state between
//! calls, and degrades gracefully on odd-but-well-typed input. Hosts own
//! catalog refresh, persistence, and explanation enrichment.

pub mod config;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod text;

pub use config::{ConfigError, ConfigOverrides, LoadOptions, RankingConfig, WeightTable};
pub use domain::{
    BudgetRange, CatalogEntry, Coupon, EntryId, Interaction, InteractionKind, KeySpecs, Offer,
    PriorityMode, UseCase, UserProfile,
};
pub use errors::DomainError;
pub use ranking::{PreferenceScorer, RankedResult, RankingEngine, SortKey, SubScores, Suitability};
pub use text::{EditDistanceMatcher, FieldMatcher, TextNormalizer};
