//! User profile types consumed by the preference scorer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub budget: BudgetRange,
    /// Informational only; not consumed by the current scoring pass.
    #[serde(default)]
    pub preferred_brands: Vec<String>,
    #[serde(default)]
    pub priority: PriorityMode,
    #[serde(default)]
    pub use_case: UseCase,
    /// Ordered interaction history, most recent last.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityMode {
    PriceFirst,
    QualityFirst,
    #[default]
    Balanced,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
    Gaming,
    Camera,
    #[default]
    Everyday,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub brand: String,
    pub category: String,
    pub kind: InteractionKind,
    pub at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Purchase,
    Wishlist,
    Click,
    View,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_mode_uses_kebab_case_wire_names() {
        let json = serde_json::to_string(&PriorityMode::PriceFirst).expect("serialize");
        assert_eq!(json, "\"price-first\"");
        let back: PriorityMode = serde_json::from_str("\"quality-first\"").expect("deserialize");
        assert_eq!(back, PriorityMode::QualityFirst);
    }

    #[test]
    fn profile_defaults_to_balanced_everyday() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"budget":{"min":2000.0,"max":4000.0}}"#).expect("deserialize");
        assert_eq!(profile.priority, PriorityMode::Balanced);
        assert_eq!(profile.use_case, UseCase::Everyday);
        assert!(profile.interactions.is_empty());
    }
}
