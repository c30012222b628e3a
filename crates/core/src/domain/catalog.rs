//! Catalog snapshot types. Entries are read-only inputs to the ranking
//! engine; the host owns catalog refresh and persistence.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product in the comparison catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub specs: KeySpecs,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

/// Hardware specification record used for use-case tier scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeySpecs {
    pub storage_gb: u32,
    pub ram_gb: u32,
    pub camera_mp: u32,
    pub battery_mah: u32,
    pub screen_size_inch: f64,
    /// Absent refresh rate scores as the low tier.
    #[serde(default)]
    pub refresh_rate_hz: Option<u32>,
}

/// A store offer for an entry. Prices are currency-agnostic numerics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
    /// Average store rating in [1, 5] when present.
    #[serde(default)]
    pub rating_average: Option<f64>,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    #[serde(default)]
    pub estimated_value: Option<f64>,
}

impl Offer {
    /// Total cost of taking this offer: price + shipping minus the first
    /// coupon's estimated value. May be non-finite or negative for corrupt
    /// input; callers treat such values as disqualifying.
    pub fn net_price(&self) -> f64 {
        let coupon_value =
            self.coupons.first().and_then(|coupon| coupon.estimated_value).unwrap_or(0.0);
        self.price + self.shipping_cost - coupon_value
    }
}
