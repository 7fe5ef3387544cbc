use super::criteria::{AreaRange, AreaRangeType, SearchCriteria};
use super::extractor::{furnishing_label, listing_type_label, property_type_label, sharing_label};
use crate::models::Listing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Listing field that satisfied a criterion, used for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedField {
    Location,
    PropertyType,
    ListingType,
    Bhk,
    Price,
    Area,
    Furnishing,
    Sharing,
    Bathrooms,
}

pub type MatchedFields = BTreeSet<MatchedField>;

/// Matcher tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Allowed relative deviation for "around N sqft"
    pub around_tolerance: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            around_tolerance: 0.10,
        }
    }
}

/// Listings split by how many criteria they satisfied
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchOutcome<'a> {
    pub exact: Vec<&'a Listing>,
    pub partial: Vec<&'a Listing>,
    pub matched_fields: MatchedFields,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Partition the catalog into exact and partial matches, preserving
    /// catalog order in both.
    pub fn match_listings<'a>(
        &self,
        listings: &'a [Listing],
        criteria: &SearchCriteria,
    ) -> MatchOutcome<'a> {
        if criteria.is_empty() {
            return MatchOutcome {
                exact: listings.iter().collect(),
                ..Default::default()
            };
        }

        let mut outcome = MatchOutcome::default();
        for listing in listings {
            let checks = self.evaluate(listing, criteria);
            let passed = checks.iter().filter(|(_, ok)| *ok).count();

            if passed == checks.len() {
                outcome
                    .matched_fields
                    .extend(checks.iter().map(|(field, _)| *field));
                outcome.exact.push(listing);
            } else if passed > 0 {
                outcome.partial.push(listing);
            }
        }

        debug!(
            catalog = listings.len(),
            exact = outcome.exact.len(),
            partial = outcome.partial.len(),
            "matched listings"
        );
        outcome
    }

    /// One entry per criterion that is set, with whether the listing passed it.
    pub fn evaluate(&self, listing: &Listing, criteria: &SearchCriteria) -> Vec<(MatchedField, bool)> {
        let strict = criteria.strict;
        let mut checks = Vec::with_capacity(9);

        if let Some(location) = &criteria.location {
            checks.push((
                MatchedField::Location,
                location_matches(&listing.location, location, strict),
            ));
        }
        if !criteria.property_types.is_empty() {
            let label = |text: &str| property_type_label(text).map(str::to_string);
            checks.push((
                MatchedField::PropertyType,
                any_label_matches(&listing.property_type, &criteria.property_types, strict, label),
            ));
        }
        if !criteria.listing_types.is_empty() {
            let label = |text: &str| listing_type_label(text).map(str::to_string);
            checks.push((
                MatchedField::ListingType,
                any_label_matches(&listing.listing_type, &criteria.listing_types, strict, label),
            ));
        }
        if let Some(bhk) = &criteria.bhk_type {
            let ok = listing
                .bhk_label()
                .is_some_and(|label| compact(&label) == compact(bhk));
            checks.push((MatchedField::Bhk, ok));
        }
        if !criteria.price_range.is_empty() {
            checks.push((MatchedField::Price, criteria.price_range.contains(listing.price)));
        }
        if !criteria.area_range.is_empty() {
            checks.push((
                MatchedField::Area,
                self.area_matches(listing.area, &criteria.area_range),
            ));
        }
        if !criteria.furnishing.is_empty() {
            let label = |text: &str| furnishing_label(text).map(str::to_string);
            checks.push((
                MatchedField::Furnishing,
                any_label_matches(&listing.furnishing, &criteria.furnishing, strict, label),
            ));
        }
        if !criteria.sharing.is_empty() {
            let value = listing.sharing.as_deref().unwrap_or_default();
            checks.push((
                MatchedField::Sharing,
                any_label_matches(value, &criteria.sharing, strict, sharing_label),
            ));
        }
        if let Some(bathrooms) = criteria.bathrooms {
            checks.push((MatchedField::Bathrooms, listing.bathrooms == bathrooms));
        }

        checks
    }

    fn area_matches(&self, area: f64, range: &AreaRange) -> bool {
        let Some(range_type) = range.range_type else {
            return true;
        };
        match range_type {
            AreaRangeType::Exact => range.exact.is_some_and(|exact| area == exact),
            AreaRangeType::AtLeast => range.min.map_or(true, |min| area >= min),
            AreaRangeType::More => range.min.map_or(true, |min| area > min),
            AreaRangeType::Less => range.max.map_or(true, |max| area < max),
            AreaRangeType::Between => {
                range.min.map_or(true, |min| area >= min) && range.max.map_or(true, |max| area <= max)
            }
            AreaRangeType::Around => range.exact.is_some_and(|target| {
                (area - target).abs() <= target.abs() * self.config.around_tolerance
            }),
        }
    }
}

/// Match with the default configuration.
pub fn match_listings<'a>(listings: &'a [Listing], criteria: &SearchCriteria) -> MatchOutcome<'a> {
    Matcher::default().match_listings(listings, criteria)
}

/// Distinct locations that share a word with the requested location without
/// satisfying it, in catalog order.
pub fn nearby_locations(listings: &[Listing], criteria: &SearchCriteria) -> Vec<String> {
    let Some(wanted) = &criteria.location else {
        return Vec::new();
    };
    let tokens: Vec<String> = wanted
        .split_whitespace()
        .filter(|token| token.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect();

    let mut seen = BTreeSet::new();
    let mut nearby = Vec::new();
    for listing in listings {
        let location = listing.location.trim();
        if location.is_empty() || location_matches(location, wanted, criteria.strict) {
            continue;
        }
        let lower = location.to_lowercase();
        if tokens.iter().any(|token| lower.contains(token.as_str())) && seen.insert(lower) {
            nearby.push(location.to_string());
        }
    }
    nearby
}

fn location_matches(location: &str, wanted: &str, strict: bool) -> bool {
    if text_matches(location, wanted, strict) {
        return true;
    }
    if strict {
        return false;
    }
    let location = location.to_lowercase();
    let mut tokens = wanted.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| location.contains(&token.to_lowercase()))
}

/// Two values that both resolve to a canonical label match only when the
/// labels are equal, so "House" never matches a "Penthouse" listing.
/// Free text outside the label table falls back to `text_matches`.
fn any_label_matches<F>(value: &str, wanted: &[String], strict: bool, label: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let value_label = label(value);
    wanted.iter().any(|w| match (&value_label, label(w)) {
        (Some(have), Some(want)) => have.eq_ignore_ascii_case(&want),
        (Some(have), None) => text_matches(have, w, strict),
        (None, _) => text_matches(value, w, strict),
    })
}

/// Case-insensitive containment, or equality in strict mode.
fn text_matches(value: &str, wanted: &str, strict: bool) -> bool {
    let value = value.trim().to_lowercase();
    let wanted = wanted.trim().to_lowercase();
    if value.is_empty() || wanted.is_empty() {
        return false;
    }
    if strict {
        value == wanted
    } else {
        value.contains(&wanted)
    }
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
