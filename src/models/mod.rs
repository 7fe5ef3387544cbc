use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod decode;

/// Core listing data model
///
/// Catalog records arrive in different shapes depending on category, so every
/// field is optional on the wire and missing values default to empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: String,
    pub title: String,
    /// Apartment, House, Villa, PG, Studio, Penthouse, Standalone Building
    pub property_type: String,
    /// Owner, Agent, PG, Platform
    pub listing_type: String,
    pub price: f64,
    pub location: String,
    pub furnishing: String,
    /// Only present on PG listings
    pub sharing: Option<String>,
    pub floor: u32,
    pub bedrooms: u32,
    /// Label such as "2 BHK" or "1 RK", when the record carries one
    pub bhk: String,
    pub bathrooms: u32,
    /// Square feet
    pub area: f64,
    pub posted_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl Listing {
    /// Decode a loosely-typed catalog record. Never fails: unknown or
    /// malformed fields fall back to their neutral value.
    pub fn from_value(value: &serde_json::Value) -> Self {
        decode::listing_from_value(value)
    }

    /// BHK/RK label of the listing, derived from the bedroom count when the
    /// record has no explicit label.
    pub fn bhk_label(&self) -> Option<String> {
        if !self.bhk.trim().is_empty() {
            Some(self.bhk.trim().to_string())
        } else if self.bedrooms > 0 {
            Some(format!("{} BHK", self.bedrooms))
        } else {
            None
        }
    }
}
