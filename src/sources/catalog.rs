use crate::models::Listing;
use serde_json::Value;
use tracing::{debug, warn};

const WRAPPER_KEYS: &[&str] = &["listings", "properties", "data", "results"];

/// Flatten a catalog document into listings.
///
/// Accepts a bare array, an object wrapping the array under one of
/// `WRAPPER_KEYS`, or an object keyed by category whose values are arrays.
pub fn listings_from_document(document: &Value) -> Vec<Listing> {
    match document {
        Value::Array(records) => records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                if record.is_object() {
                    Some(Listing::from_value(record))
                } else {
                    warn!("Skipping catalog record {}: not an object", idx);
                    None
                }
            })
            .collect(),
        Value::Object(obj) => {
            if let Some(inner) = WRAPPER_KEYS
                .iter()
                .filter_map(|key| obj.get(*key))
                .find(|value| value.is_array())
            {
                return listings_from_document(inner);
            }

            let mut listings = Vec::new();
            for (category, records) in obj.iter().filter(|(_, value)| value.is_array()) {
                let found = listings_from_document(records);
                debug!("Category {}: {} listings", category, found.len());
                listings.extend(found);
            }
            if listings.is_empty() {
                warn!("Catalog document contains no listing arrays");
            }
            listings
        }
        _ => {
            warn!("Catalog document is neither an array nor an object");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let listings = listings_from_document(&json!([
            { "id": "1", "price": 1000 },
            "garbage",
            { "id": "2", "rent": "2,000" }
        ]));
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].price, 2000.0);
    }

    #[test]
    fn test_wrapped_array() {
        let listings = listings_from_document(&json!({
            "count": 1,
            "data": [{ "id": "only" }]
        }));
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "only");
    }

    #[test]
    fn test_category_keyed_object() {
        let listings = listings_from_document(&json!({
            "apartments": [{ "id": "a1" }, { "id": "a2" }],
            "pg": [{ "id": "p1", "sharingType": "3 Sharing" }],
            "meta": { "generated": "today" }
        }));
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "p1"]);
        assert_eq!(listings[2].sharing.as_deref(), Some("3 Sharing"));
    }

    #[test]
    fn test_scalar_document() {
        assert!(listings_from_document(&json!(42)).is_empty());
    }
}
