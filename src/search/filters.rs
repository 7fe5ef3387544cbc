use super::criteria::{AreaRange, PriceRange, SearchCriteria};
use super::extractor::{furnishing_label, listing_type_label, property_type_label, sharing_label};
use serde::{Deserialize, Serialize};
use std::ops::Bound;
use tracing::debug;

/// Inclusive numeric band selected in the filter panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Structured selections from the filter panel. Never derived from text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub listing_types: Vec<String>,
    pub property_types: Vec<String>,
    pub furnishing_types: Vec<String>,
    pub sharing_types: Vec<String>,
    pub price_range: RangeFilter,
    /// Square feet
    pub area_range: RangeFilter,
    /// Require exact equality on text fields
    pub strict: bool,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.listing_types.is_empty()
            && self.property_types.is_empty()
            && self.furnishing_types.is_empty()
            && self.sharing_types.is_empty()
            && self.price_range.is_empty()
            && self.area_range.is_empty()
            && !self.strict
    }
}

/// Overlay explicit filter selections onto text-derived criteria.
///
/// A selected field replaces the criteria field outright. Fields with no
/// selection keep whatever the query text produced. Selections are mapped to
/// the same canonical labels the extractor emits ("Flat" -> "Apartment",
/// "Double Sharing" -> "2 Sharing"); unknown values pass through trimmed.
pub fn merge(mut criteria: SearchCriteria, filters: &Filters) -> SearchCriteria {
    let label = |v: &str| listing_type_label(v).map(str::to_string);
    if let Some(types) = selected(&filters.listing_types, label) {
        criteria.listing_types = types;
    }
    let label = |v: &str| property_type_label(v).map(str::to_string);
    if let Some(types) = selected(&filters.property_types, label) {
        criteria.property_types = types;
    }
    let label = |v: &str| furnishing_label(v).map(str::to_string);
    if let Some(types) = selected(&filters.furnishing_types, label) {
        criteria.furnishing = types;
    }
    if let Some(types) = selected(&filters.sharing_types, sharing_label) {
        criteria.sharing = types;
    }

    if !filters.price_range.is_empty() {
        criteria.price_range = PriceRange {
            min: filters.price_range.min.map_or(Bound::Unbounded, Bound::Included),
            max: filters.price_range.max.map_or(Bound::Unbounded, Bound::Included),
            strict: true,
        };
    }

    if !filters.area_range.is_empty() {
        criteria.area_range = match (filters.area_range.min, filters.area_range.max) {
            (Some(min), Some(max)) => AreaRange::between(min, max),
            (Some(min), None) => AreaRange::at_least(min),
            (None, Some(max)) => AreaRange::at_most(max),
            (None, None) => AreaRange::default(),
        };
    }

    if filters.strict {
        criteria.strict = true;
    }

    debug!(?criteria, "merged filter selections");
    criteria
}

/// Non-blank selections in canonical form, or None when nothing was selected.
fn selected<F>(values: &[String], label: F) -> Option<Vec<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| label(v).unwrap_or_else(|| v.to_string()))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::extractor::extract;
    use crate::search::normalizer::normalize;

    #[test]
    fn test_filter_wins_over_text() {
        let criteria = extract(&normalize("semi furnished flat in indiranagar"));
        assert_eq!(criteria.furnishing, vec!["Semi Furnished"]);

        let filters = Filters {
            furnishing_types: vec!["Unfurnished".to_string()],
            ..Default::default()
        };
        let merged = merge(criteria, &filters);

        assert_eq!(merged.furnishing, vec!["Unfurnished"]);
        assert_eq!(merged.property_types, vec!["Apartment"]);
        assert_eq!(merged.location.as_deref(), Some("indiranagar"));
    }

    #[test]
    fn test_selections_use_canonical_labels() {
        let filters = Filters {
            listing_types: vec!["No Broker".to_string()],
            property_types: vec!["Flat".to_string(), "Independent House".to_string()],
            furnishing_types: vec!["Semi-Furnished".to_string()],
            sharing_types: vec!["Double Sharing".to_string()],
            ..Default::default()
        };
        let merged = merge(SearchCriteria::default(), &filters);

        assert_eq!(merged.listing_types, vec!["Owner"]);
        assert_eq!(merged.property_types, vec!["Apartment", "House"]);
        assert_eq!(merged.furnishing, vec!["Semi Furnished"]);
        assert_eq!(merged.sharing, vec!["2 Sharing"]);
    }

    #[test]
    fn test_unknown_selection_passes_through() {
        let filters = Filters {
            property_types: vec![" Farm Land ".to_string()],
            ..Default::default()
        };
        let merged = merge(SearchCriteria::default(), &filters);
        assert_eq!(merged.property_types, vec!["Farm Land"]);
    }

    #[test]
    fn test_filter_price_replaces_text_price() {
        let criteria = extract(&normalize("under 50k"));
        let filters = Filters {
            price_range: RangeFilter::new(Some(10000.0), Some(20000.0)),
            ..Default::default()
        };
        let merged = merge(criteria, &filters);

        assert_eq!(merged.price_range.min, Bound::Included(10000.0));
        assert_eq!(merged.price_range.max, Bound::Included(20000.0));
        assert!(merged.price_range.strict);
    }

    #[test]
    fn test_open_ended_filter_price() {
        let filters = Filters {
            price_range: RangeFilter::new(None, Some(15000.0)),
            ..Default::default()
        };
        let merged = merge(SearchCriteria::default(), &filters);
        assert_eq!(merged.price_range.min, Bound::Unbounded);
        assert!(merged.price_range.contains(15000.0));
        assert!(!merged.price_range.contains(15001.0));
    }

    #[test]
    fn test_blank_selections_are_ignored() {
        let criteria = extract(&normalize("2 sharing"));
        let filters = Filters {
            sharing_types: vec!["  ".to_string()],
            ..Default::default()
        };
        let merged = merge(criteria.clone(), &filters);
        assert_eq!(merged, criteria);
    }

    #[test]
    fn test_empty_filters_leave_criteria_unchanged() {
        let criteria = extract(&normalize("villa in whitefield above 50k"));
        assert!(Filters::default().is_empty());
        assert_eq!(merge(criteria.clone(), &Filters::default()), criteria);
    }

    #[test]
    fn test_area_filter() {
        let filters = Filters {
            area_range: RangeFilter::new(Some(1000.0), Some(1500.0)),
            ..Default::default()
        };
        let merged = merge(extract(&normalize("3 bhk")), &filters);
        assert_eq!(merged.area_range, AreaRange::between(1000.0, 1500.0));
        assert_eq!(merged.bhk_type.as_deref(), Some("3 BHK"));
    }
}
