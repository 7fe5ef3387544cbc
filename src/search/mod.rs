//! Query interpretation and listing matching for the browse page.
//!
//! `normalize` → `extract` → `merge` → `match_listings` → `sort_listings`.
//! Every stage is a pure function; callers recompute the whole result when
//! the query, the filter selection or the catalog changes.

pub mod criteria;
pub mod extractor;
pub mod filters;
pub mod matcher;
pub mod normalizer;
pub mod sorter;

pub use criteria::{AreaRange, AreaRangeType, PriceRange, SearchCriteria};
pub use extractor::extract;
pub use filters::{merge, Filters, RangeFilter};
pub use matcher::{
    match_listings, nearby_locations, MatchOutcome, MatchedField, MatchedFields, Matcher,
    MatcherConfig,
};
pub use normalizer::normalize;
pub use sorter::{sort_listings, SortOrder};

use crate::models::Listing;
use serde::Serialize;
use tracing::debug;

/// Everything the browse page renders for one query evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<'a> {
    pub exact: Vec<&'a Listing>,
    pub partial: Vec<&'a Listing>,
    pub matched_fields: MatchedFields,
    pub nearby_locations: Vec<String>,
    pub criteria: SearchCriteria,
}

/// Criteria for a query string and filter selection.
pub fn build_criteria(query: &str, filters: &Filters) -> SearchCriteria {
    let normalized = normalize(query);
    debug!(raw = query, normalized = %normalized, "normalized query");
    merge(extract(&normalized), filters)
}

/// Run the full pipeline with the default matcher configuration.
pub fn search<'a>(
    listings: &'a [Listing],
    query: &str,
    filters: &Filters,
    order: SortOrder,
) -> SearchResult<'a> {
    search_with(&Matcher::default(), listings, query, filters, order)
}

pub fn search_with<'a>(
    matcher: &Matcher,
    listings: &'a [Listing],
    query: &str,
    filters: &Filters,
    order: SortOrder,
) -> SearchResult<'a> {
    let criteria = build_criteria(query, filters);
    let outcome = matcher.match_listings(listings, &criteria);

    SearchResult {
        exact: sort_listings(&outcome.exact, order),
        partial: sort_listings(&outcome.partial, order),
        matched_fields: outcome.matched_fields,
        nearby_locations: nearby_locations(listings, &criteria),
        criteria,
    }
}
