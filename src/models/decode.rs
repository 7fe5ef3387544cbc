use super::Listing;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id", "_id", "propertyId", "property_id"];
const TITLE_KEYS: &[&str] = &["title", "name", "propertyName", "property_name"];
const PROPERTY_TYPE_KEYS: &[&str] = &["propertyType", "property_type", "type"];
const LISTING_TYPE_KEYS: &[&str] = &["listingType", "listing_type", "postedBy", "posted_by"];
const PRICE_KEYS: &[&str] = &[
    "price",
    "rent",
    "expectedPrice",
    "expected_price",
    "monthlyRent",
    "monthly_rent",
];
const LOCATION_KEYS: &[&str] = &["location", "address", "locality"];
const LOCATION_PARTS: &[&str] = &["address", "locality", "area", "city"];
const FURNISHING_KEYS: &[&str] = &["furnishing", "furnishingStatus", "furnishing_status"];
const SHARING_KEYS: &[&str] = &["sharing", "sharingType", "sharing_type"];
const FLOOR_KEYS: &[&str] = &["floor", "floorNumber", "floor_number", "floors"];
const BEDROOM_KEYS: &[&str] = &["bedrooms", "bedroom", "rooms"];
const BHK_KEYS: &[&str] = &["bhk", "bhkType", "bhk_type"];
const BATHROOM_KEYS: &[&str] = &["bathrooms", "bathroom", "baths"];
const AREA_KEYS: &[&str] = &[
    "area",
    "builtUpArea",
    "built_up_area",
    "carpetArea",
    "carpet_area",
    "superArea",
    "sqft",
];
const POSTED_KEYS: &[&str] = &[
    "postedAt",
    "posted_at",
    "postedOn",
    "posted_on",
    "postedDate",
    "createdAt",
    "created_at",
    "date",
];
const STATUS_KEYS: &[&str] = &["status"];

pub(super) fn listing_from_value(value: &Value) -> Listing {
    let Some(obj) = value.as_object() else {
        return Listing::default();
    };

    Listing {
        id: first(obj, ID_KEYS).map(text).unwrap_or_default(),
        title: first(obj, TITLE_KEYS).map(text).unwrap_or_default(),
        property_type: first(obj, PROPERTY_TYPE_KEYS).map(text).unwrap_or_default(),
        listing_type: first(obj, LISTING_TYPE_KEYS).map(text).unwrap_or_default(),
        price: first(obj, PRICE_KEYS).map(number).unwrap_or_default(),
        location: first(obj, LOCATION_KEYS).map(location).unwrap_or_default(),
        furnishing: first(obj, FURNISHING_KEYS).map(text).unwrap_or_default(),
        sharing: first(obj, SHARING_KEYS)
            .map(text)
            .filter(|s| !s.is_empty()),
        floor: first(obj, FLOOR_KEYS).map(count).unwrap_or_default(),
        bedrooms: first(obj, BEDROOM_KEYS).map(count).unwrap_or_default(),
        bhk: first(obj, BHK_KEYS).map(bhk).unwrap_or_default(),
        bathrooms: first(obj, BATHROOM_KEYS).map(count).unwrap_or_default(),
        area: first(obj, AREA_KEYS).map(number).unwrap_or_default(),
        posted_at: first(obj, POSTED_KEYS).and_then(timestamp),
        status: first(obj, STATUS_KEYS).map(text).unwrap_or_default(),
    }
}

/// First key present with a non-null value.
fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => leading_number(s).unwrap_or_default(),
        _ => 0.0,
    }
}

fn count(value: &Value) -> u32 {
    let n = number(value);
    if n.is_finite() && n > 0.0 {
        n as u32
    } else {
        0
    }
}

/// A bare number is taken to be a bedroom count.
fn bhk(value: &Value) -> String {
    match value {
        Value::Number(_) => match count(value) {
            0 => String::new(),
            n => format!("{} BHK", n),
        },
        _ => text(value),
    }
}

/// First numeric run in a string such as "₹ 25,000/month" or "1200 sqft".
fn leading_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let digits: String = cleaned[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

fn location(value: &Value) -> String {
    match value {
        Value::Object(parts) => LOCATION_PARTS
            .iter()
            .filter_map(|key| parts.get(*key))
            .map(text)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => text(other),
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // Values past the year 5138 in seconds are treated as milliseconds
            if raw.abs() >= 100_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }
        Value::Object(obj) => {
            if let Some(date) = obj.get("$date") {
                return timestamp(date);
            }
            let seconds = obj.get("seconds").or_else(|| obj.get("_seconds"))?.as_i64()?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or_default();
            DateTime::from_timestamp(seconds, nanos as u32)
        }
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
