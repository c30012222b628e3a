//! Ranking pipeline: preference scoring and the recommendation / search
//! combiners.

mod engine;
mod preference;
mod types;

pub use engine::RankingEngine;
pub use preference::{PreferenceScorer, Suitability};
pub use types::{RankedResult, SortKey, SubScores};
