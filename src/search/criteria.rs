use serde::{Deserialize, Serialize};
use std::ops::Bound;

/// Price constraint. Bounds are exclusive for "under"/"above" phrasing and
/// inclusive for "up to"/"at least"/"between" and explicit filter ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Bound<f64>,
    pub max: Bound<f64>,
    /// Set for exact-value phrasing and explicit filter ranges
    pub strict: bool,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Bound::Unbounded,
            max: Bound::Unbounded,
            strict: false,
        }
    }
}

impl PriceRange {
    /// Both bounds inclusive.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Bound::Included(min),
            max: Bound::Included(max),
            strict: false,
        }
    }

    /// A single price, `min == max`.
    pub fn exactly(value: f64) -> Self {
        Self {
            strict: true,
            ..Self::between(value, value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.min, Bound::Unbounded) && matches!(self.max, Bound::Unbounded)
    }

    pub fn min_value(&self) -> Option<f64> {
        bound_value(&self.min)
    }

    pub fn max_value(&self) -> Option<f64> {
        bound_value(&self.max)
    }

    pub fn contains(&self, price: f64) -> bool {
        if self.strict {
            if let (Some(min), Some(max)) = (self.min_value(), self.max_value()) {
                if min == max {
                    return price == min;
                }
            }
        }

        let above_min = match self.min {
            Bound::Included(min) => price >= min,
            Bound::Excluded(min) => price > min,
            Bound::Unbounded => true,
        };
        let below_max = match self.max {
            Bound::Included(max) => price <= max,
            Bound::Excluded(max) => price < max,
            Bound::Unbounded => true,
        };
        above_min && below_max
    }
}

fn bound_value(bound: &Bound<f64>) -> Option<f64> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(*v),
        Bound::Unbounded => None,
    }
}

/// How an area figure in the query was phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaRangeType {
    Exact,
    AtLeast,
    More,
    Less,
    Between,
    Around,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub exact: Option<f64>,
    pub strict: bool,
    pub range_type: Option<AreaRangeType>,
}

impl AreaRange {
    pub fn exact(value: f64) -> Self {
        Self {
            exact: Some(value),
            strict: true,
            range_type: Some(AreaRangeType::Exact),
            ..Default::default()
        }
    }

    pub fn at_least(value: f64) -> Self {
        Self {
            min: Some(value),
            range_type: Some(AreaRangeType::AtLeast),
            ..Default::default()
        }
    }

    pub fn more_than(value: f64) -> Self {
        Self {
            min: Some(value),
            strict: true,
            range_type: Some(AreaRangeType::More),
            ..Default::default()
        }
    }

    pub fn less_than(value: f64) -> Self {
        Self {
            max: Some(value),
            strict: true,
            range_type: Some(AreaRangeType::Less),
            ..Default::default()
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            range_type: Some(AreaRangeType::Between),
            ..Default::default()
        }
    }

    /// Inclusive upper bound only.
    pub fn at_most(value: f64) -> Self {
        Self {
            max: Some(value),
            range_type: Some(AreaRangeType::Between),
            ..Default::default()
        }
    }

    pub fn around(value: f64) -> Self {
        Self {
            exact: Some(value),
            range_type: Some(AreaRangeType::Around),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.range_type.is_none()
    }
}

/// Structured form of what the user is looking for, derived from the query
/// text and the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub location: Option<String>,
    /// Any of these property types is acceptable
    pub property_types: Vec<String>,
    pub bhk_type: Option<String>,
    pub price_range: PriceRange,
    pub area_range: AreaRange,
    /// Any of these furnishing labels is acceptable
    pub furnishing: Vec<String>,
    /// Any of these sharing labels is acceptable
    pub sharing: Vec<String>,
    pub listing_types: Vec<String>,
    pub bathrooms: Option<u32>,
    /// Require equality instead of substring containment on text fields
    pub strict: bool,
}

impl SearchCriteria {
    /// True when no field constrains the result. `strict` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.property_types.is_empty()
            && self.bhk_type.is_none()
            && self.price_range.is_empty()
            && self.area_range.is_empty()
            && self.furnishing.is_empty()
            && self.sharing.is_empty()
            && self.listing_types.is_empty()
            && self.bathrooms.is_none()
    }
}
