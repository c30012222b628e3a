//! Host-facing result types for the ranking pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::EntryId;
use crate::errors::DomainError;

/// One ranked catalog entry with its computed scores.
///
/// `reason` is a deterministic placeholder line; the host's explanation
/// service replaces it asynchronously after ranking, so results are
/// displayable immediately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entry_id: EntryId,
    pub name: String,
    /// Text-match strength in [0, 1]. Present in search mode only.
    pub relevance: Option<f64>,
    /// Preference-fit strength in [0, 1].
    pub suitability: f64,
    /// Blend of relevance and suitability. Present in search mode only.
    pub combined: Option<f64>,
    /// Net price of the selected best offer, when one qualified.
    pub best_net_price: Option<f64>,
    /// Rating of the selected best offer, when present and in range.
    pub best_rating: Option<f64>,
    pub breakdown: SubScores,
    pub reason: String,
}

/// The four suitability sub-scores, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub price: f64,
    pub specs: f64,
    pub trust: f64,
    pub behavior: f64,
}

/// Sort order for search results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Combined score, descending.
    #[default]
    Combined,
    /// Best-offer net price, ascending; entries without a priced offer last.
    NetPriceAsc,
    /// Best-offer rating, descending; unrated entries last.
    RatingDesc,
}

impl std::str::FromStr for SortKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "combined" | "score" => Ok(Self::Combined),
            "price" | "price_asc" => Ok(Self::NetPriceAsc),
            "rating" => Ok(Self::RatingDesc),
            other => Err(DomainError::InvalidInput(format!(
                "unsupported sort key `{other}` (expected combined|price|rating)"
            ))),
        }
    }
}
