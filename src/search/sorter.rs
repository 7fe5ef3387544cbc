use crate::models::Listing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering picked by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Matcher output order
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    /// Most recently posted first
    Date,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "relevance",
            SortOrder::PriceAsc => "price-asc",
            SortOrder::PriceDesc => "price-desc",
            SortOrder::Date => "date",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortOrder::Relevance),
            "price-asc" => Ok(SortOrder::PriceAsc),
            "price-desc" => Ok(SortOrder::PriceDesc),
            "date" => Ok(SortOrder::Date),
            other => anyhow::bail!(
                "unknown sort order '{}' (expected relevance, price-asc, price-desc or date)",
                other
            ),
        }
    }
}

/// Return a reordered copy. Ties keep their input order.
pub fn sort_listings<'a>(listings: &[&'a Listing], order: SortOrder) -> Vec<&'a Listing> {
    let mut sorted = listings.to_vec();
    match order {
        SortOrder::Relevance => {}
        SortOrder::PriceAsc => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDesc => sorted.sort_by(|a, b| b.price.total_cmp(&a.price)),
        // Listings without a posting date go last
        SortOrder::Date => sorted.sort_by(|a, b| b.posted_at.cmp(&a.posted_at)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn listing(id: &str, price: f64, day: Option<u32>) -> Listing {
        Listing {
            id: id.to_string(),
            price,
            posted_at: day.map(|d| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn ids(listings: &[&Listing]) -> Vec<String> {
        listings.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let owned = vec![
            listing("a", 30000.0, Some(3)),
            listing("b", 10000.0, None),
            listing("c", 20000.0, Some(9)),
            listing("d", 10000.0, Some(1)),
        ];
        let refs: Vec<&Listing> = owned.iter().collect();

        assert_eq!(ids(&sort_listings(&refs, SortOrder::Relevance)), ["a", "b", "c", "d"]);
        assert_eq!(ids(&sort_listings(&refs, SortOrder::PriceAsc)), ["b", "d", "c", "a"]);
        assert_eq!(ids(&sort_listings(&refs, SortOrder::PriceDesc)), ["a", "c", "b", "d"]);
        assert_eq!(ids(&sort_listings(&refs, SortOrder::Date)), ["c", "a", "d", "b"]);

        // input untouched
        assert_eq!(ids(&refs), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_sort_order() {
        assert_eq!("price-asc".parse::<SortOrder>().unwrap(), SortOrder::PriceAsc);
        assert_eq!(" DATE ".parse::<SortOrder>().unwrap(), SortOrder::Date);
        assert!("cheapest".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::PriceDesc.to_string(), "price-desc");
    }
}
