//! Turns a normalized query string into [`SearchCriteria`].
//!
//! Each detector works on the whole string and reports the value it found
//! together with the byte spans it used. The location is whatever is left
//! once every detector's spans are blanked out and stopwords are dropped.

use super::criteria::{AreaRange, PriceRange, SearchCriteria};
use regex::{Captures, Regex};
use std::ops::{Bound, Range};
use std::sync::OnceLock;
use tracing::debug;

/// What a single detector contributed.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection<T> {
    pub value: Option<T>,
    /// Byte ranges of the normalized string the detector used
    pub consumed: Vec<Range<usize>>,
}

impl<T> Default for Detection<T> {
    fn default() -> Self {
        Self {
            value: None,
            consumed: Vec::new(),
        }
    }
}

impl<T> Detection<T> {
    fn found(value: T, consumed: Vec<Range<usize>>) -> Self {
        Self {
            value: Some(value),
            consumed,
        }
    }
}

const NUM: &str = r"(\d+(?:\.\d+)?)";
const CURRENCY_NUM: &str = r"(?:(?:\brs\.?|₹)\s*)?(\d+(?:\.\d+)?)\b";

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "in", "at", "near", "nearby", "around", "on", "of", "for", "with", "and",
    "or", "to", "from", "by", "me", "my", "i", "want", "need", "looking", "show", "find",
    "search", "get", "any", "all", "some", "property", "properties", "listing", "listings",
    "home", "homes", "rent", "rental", "sale", "sell", "buy", "price", "cost", "budget", "rs",
    "inr", "k", "under", "below", "above", "over", "between", "less", "more", "than", "least",
    "atleast", "most", "atmost", "upto", "up", "within", "max", "maximum", "min", "minimum",
    "exactly", "about", "approx", "cheap", "available", "is", "are", "per", "month", "monthly",
    "sqft", "area", "size", "room", "rooms", "only",
];

static QUANTITY: OnceLock<Regex> = OnceLock::new();
static PRICE_BETWEEN: OnceLock<Regex> = OnceLock::new();
static PRICE_DASH: OnceLock<Regex> = OnceLock::new();
static PRICE_ABOVE: OnceLock<Regex> = OnceLock::new();
static PRICE_AT_LEAST: OnceLock<Regex> = OnceLock::new();
static PRICE_UNDER: OnceLock<Regex> = OnceLock::new();
static PRICE_UP_TO: OnceLock<Regex> = OnceLock::new();
static PRICE_EXACT: OnceLock<Regex> = OnceLock::new();
static PRICE_BARE: OnceLock<Regex> = OnceLock::new();
static AREA_BETWEEN: OnceLock<Regex> = OnceLock::new();
static AREA_DASH: OnceLock<Regex> = OnceLock::new();
static AREA_AT_LEAST: OnceLock<Regex> = OnceLock::new();
static AREA_MORE: OnceLock<Regex> = OnceLock::new();
static AREA_LESS: OnceLock<Regex> = OnceLock::new();
static AREA_UP_TO: OnceLock<Regex> = OnceLock::new();
static AREA_AROUND: OnceLock<Regex> = OnceLock::new();
static AREA_EXACT: OnceLock<Regex> = OnceLock::new();
static BHK: OnceLock<Regex> = OnceLock::new();
static BEDROOMS: OnceLock<Regex> = OnceLock::new();
static BATHROOMS: OnceLock<Regex> = OnceLock::new();
static FURNISHING: OnceLock<Regex> = OnceLock::new();
static SHARING: OnceLock<Regex> = OnceLock::new();
static PROPERTY_TYPE: OnceLock<Regex> = OnceLock::new();
static LISTING_TYPE: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: impl FnOnce() -> String) -> &'static Regex {
    cell.get_or_init(|| Regex::new(&pattern()).expect("extractor pattern is valid"))
}

/// Run every detector over a normalized query and combine the results.
pub fn extract(normalized: &str) -> SearchCriteria {
    let price = detect_price(normalized);
    let area = detect_area(normalized);
    let bhk = detect_bhk(normalized);
    let bathrooms = detect_bathrooms(normalized);
    let furnishing = detect_furnishing(normalized);
    let sharing = detect_sharing(normalized);
    let property_types = detect_property_types(normalized);
    let listing_types = detect_listing_types(normalized);

    let consumed: Vec<Range<usize>> = [
        &price.consumed,
        &area.consumed,
        &bhk.consumed,
        &bathrooms.consumed,
        &furnishing.consumed,
        &sharing.consumed,
        &property_types.consumed,
        &listing_types.consumed,
    ]
    .into_iter()
    .flatten()
    .cloned()
    .collect();

    let criteria = SearchCriteria {
        location: location_remainder(normalized, &consumed),
        property_types: property_types.value.unwrap_or_default(),
        bhk_type: bhk.value,
        price_range: price.value.unwrap_or_default(),
        area_range: area.value.unwrap_or_default(),
        furnishing: furnishing.value.into_iter().collect(),
        sharing: sharing.value.into_iter().collect(),
        listing_types: listing_types.value.unwrap_or_default(),
        bathrooms: bathrooms.value,
        strict: false,
    };

    debug!(query = normalized, ?criteria, "extracted search criteria");
    criteria
}

/// Price bounds. A number that belongs to an area, BHK, sharing or bathroom
/// phrase is never read as a price.
pub fn detect_price(text: &str) -> Detection<PriceRange> {
    let quantities: Vec<Range<usize>> = regex(&QUANTITY, || {
        format!(
            r"\b{NUM}(?:\s*sqft)?(?:\s*(?:and|to|-)\s*{NUM})?\s*(?:sqft|bhk|rk|share|sharing|bath|baths|bathrooms?|bed|beds|bedrooms?)\b"
        )
    })
    .find_iter(text)
    .map(|m| m.range())
    .collect();

    let first_price = |re: &'static Regex| {
        re.captures_iter(text).find(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .all(|group| !overlaps_any(&group.range(), &quantities))
        })
    };

    let between = [
        regex(&PRICE_BETWEEN, || {
            format!(r"\b(?:between|from)\s+{CURRENCY_NUM}\s*(?:and|to|-)\s*{CURRENCY_NUM}")
        }),
        regex(&PRICE_DASH, || {
            r"\b(\d{3,}(?:\.\d+)?)\s*(?:-|to)\s*(\d{3,}(?:\.\d+)?)\b".to_string()
        }),
    ];
    for re in between {
        if let Some(caps) = first_price(re) {
            if let (Some(min), Some(max)) = (number(&caps, 1), number(&caps, 2)) {
                return Detection::found(PriceRange::between(min, max), vec![whole(&caps)]);
            }
        }
    }

    let mut range = PriceRange::default();
    let mut consumed = Vec::new();

    let lower: [(&Regex, fn(f64) -> Bound<f64>); 2] = [
        (
            regex(&PRICE_ABOVE, || {
                format!(r"\b(?:above|over|more than|greater than|beyond)\s+{CURRENCY_NUM}")
            }),
            Bound::Excluded,
        ),
        (
            regex(&PRICE_AT_LEAST, || {
                format!(
                    r"\b(?:at least|atleast|minimum|min|starting from|starting at|starting|from)\s+{CURRENCY_NUM}"
                )
            }),
            Bound::Included,
        ),
    ];
    for (re, bound) in lower {
        if let Some(caps) = first_price(re) {
            if let Some(value) = number(&caps, 1) {
                range.min = bound(value);
                consumed.push(whole(&caps));
                break;
            }
        }
    }

    let upper: [(&Regex, fn(f64) -> Bound<f64>); 2] = [
        (
            regex(&PRICE_UNDER, || {
                format!(r"\b(?:under|below|less than|lesser than|cheaper than)\s+{CURRENCY_NUM}")
            }),
            Bound::Excluded,
        ),
        (
            regex(&PRICE_UP_TO, || {
                format!(
                    r"\b(?:up to|upto|within|maximum|max|at most|atmost|budget of|budget)\s+{CURRENCY_NUM}"
                )
            }),
            Bound::Included,
        ),
    ];
    for (re, bound) in upper {
        if let Some(caps) = first_price(re) {
            if let Some(value) = number(&caps, 1) {
                range.max = bound(value);
                consumed.push(whole(&caps));
                break;
            }
        }
    }

    if !range.is_empty() {
        return Detection::found(range, consumed);
    }

    let exact = [
        regex(&PRICE_EXACT, || {
            format!(r"\b(?:exactly|price|cost|rent|for|at)\s+{CURRENCY_NUM}")
        }),
        regex(&PRICE_BARE, || r"(?:(?:\brs\.?|₹)\s*)?\b(\d{3,}(?:\.\d+)?)\b".to_string()),
    ];
    for re in exact {
        if let Some(caps) = first_price(re) {
            if let Some(value) = number(&caps, 1) {
                return Detection::found(PriceRange::exactly(value), vec![whole(&caps)]);
            }
        }
    }

    Detection::default()
}

/// Area phrases, always anchored on the `sqft` unit.
pub fn detect_area(text: &str) -> Detection<AreaRange> {
    let rules: [(&'static Regex, fn(&Captures) -> Option<AreaRange>); 8] = [
        (
            regex(&AREA_BETWEEN, || {
                format!(r"\b(?:between|from)\s+{NUM}(?:\s*sqft)?\s*(?:and|to|-)\s*{NUM}\s*sqft\b")
            }),
            |caps| Some(AreaRange::between(number(caps, 1)?, number(caps, 2)?)),
        ),
        (
            regex(&AREA_DASH, || format!(r"\b{NUM}\s*(?:-|to)\s*{NUM}\s*sqft\b")),
            |caps| Some(AreaRange::between(number(caps, 1)?, number(caps, 2)?)),
        ),
        (
            regex(&AREA_AT_LEAST, || {
                format!(r"\b(?:at least|atleast|minimum|min)\s+{NUM}\s*sqft\b")
            }),
            |caps| Some(AreaRange::at_least(number(caps, 1)?)),
        ),
        (
            regex(&AREA_MORE, || {
                format!(
                    r"\b(?:more than|greater than|bigger than|larger than|above|over)\s+{NUM}\s*sqft\b"
                )
            }),
            |caps| Some(AreaRange::more_than(number(caps, 1)?)),
        ),
        (
            regex(&AREA_LESS, || {
                format!(r"\b(?:less than|smaller than|under|below)\s+{NUM}\s*sqft\b")
            }),
            |caps| Some(AreaRange::less_than(number(caps, 1)?)),
        ),
        (
            regex(&AREA_UP_TO, || {
                format!(r"\b(?:up to|upto|at most|atmost|maximum|max)\s+{NUM}\s*sqft\b")
            }),
            |caps| Some(AreaRange::at_most(number(caps, 1)?)),
        ),
        (
            regex(&AREA_AROUND, || {
                format!(
                    r"\b(?:around|about|approximately|approx|nearly|roughly)\s+{NUM}\s*sqft\b"
                )
            }),
            |caps| Some(AreaRange::around(number(caps, 1)?)),
        ),
        (
            regex(&AREA_EXACT, || format!(r"\b{NUM}\s*sqft\b")),
            |caps| Some(AreaRange::exact(number(caps, 1)?)),
        ),
    ];

    for (re, build) in rules {
        if let Some(caps) = re.captures(text) {
            if let Some(area) = build(&caps) {
                return Detection::found(area, vec![whole(&caps)]);
            }
        }
    }
    Detection::default()
}

/// "3 bhk", "1 rk", "2 bedrooms".
pub fn detect_bhk(text: &str) -> Detection<String> {
    let bhk = regex(&BHK, || r"\b(\d+)\s*(bhk|rk)\b".to_string());
    if let Some(caps) = bhk.captures(text) {
        let label = format!("{} {}", &caps[1], caps[2].to_uppercase());
        return Detection::found(label, vec![whole(&caps)]);
    }

    let bedrooms = regex(&BEDROOMS, || r"\b(\d+)\s*(?:bed|beds|bedroom|bedrooms)\b".to_string());
    if let Some(caps) = bedrooms.captures(text) {
        return Detection::found(format!("{} BHK", &caps[1]), vec![whole(&caps)]);
    }

    Detection::default()
}

pub fn detect_bathrooms(text: &str) -> Detection<u32> {
    let re = regex(&BATHROOMS, || {
        r"\b(\d+)\s*(?:bath|baths|bathroom|bathrooms)\b".to_string()
    });
    re.captures(text)
        .and_then(|caps| Some(Detection::found(caps[1].parse().ok()?, vec![whole(&caps)])))
        .unwrap_or_default()
}

pub fn detect_furnishing(text: &str) -> Detection<String> {
    let re = furnishing_regex();
    re.find(text)
        .and_then(|m| {
            let label = furnishing_label(m.as_str())?;
            Some(Detection::found(label.to_string(), vec![m.range()]))
        })
        .unwrap_or_default()
}

/// PG-only: "2 sharing", "double share".
pub fn detect_sharing(text: &str) -> Detection<String> {
    let re = sharing_regex();
    re.captures(text)
        .and_then(|caps| Some(Detection::found(sharing_count(&caps[1])?, vec![whole(&caps)])))
        .unwrap_or_default()
}

pub fn detect_property_types(text: &str) -> Detection<Vec<String>> {
    let mut types: Vec<String> = Vec::new();
    let mut consumed = Vec::new();
    for m in property_type_regex().find_iter(text) {
        if let Some(label) = property_type_label(m.as_str()) {
            if !types.iter().any(|t| t == label) {
                types.push(label.to_string());
            }
            consumed.push(m.range());
        }
    }
    if types.is_empty() {
        Detection::default()
    } else {
        Detection::found(types, consumed)
    }
}

pub fn detect_listing_types(text: &str) -> Detection<Vec<String>> {
    let mut types: Vec<String> = Vec::new();
    let mut consumed = Vec::new();
    for m in listing_type_regex().find_iter(text) {
        if let Some(label) = listing_type_label(m.as_str()) {
            if !types.iter().any(|t| t == label) {
                types.push(label.to_string());
            }
            consumed.push(m.range());
        }
    }
    if types.is_empty() {
        Detection::default()
    } else {
        Detection::found(types, consumed)
    }
}

/// Words not used by any detector, minus stopwords, in their original order.
pub fn location_remainder(text: &str, consumed: &[Range<usize>]) -> Option<String> {
    let mut remaining = text.to_string();
    for range in consumed {
        if range.end <= remaining.len() {
            remaining.replace_range(range.clone(), &" ".repeat(range.len()));
        }
    }

    let words: Vec<&str> = remaining
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .filter(|word| !STOPWORDS.contains(word))
        .filter(|word| word.chars().count() > 1 || word.chars().all(|c| c.is_ascii_digit()))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Canonical furnishing label for free text, e.g. "semi-furnished" or a
/// listing's "Furnished".
pub fn furnishing_label(text: &str) -> Option<&'static str> {
    let compact: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if !compact.contains("furnished") {
        None
    } else if compact.starts_with("semi") {
        Some("Semi Furnished")
    } else if compact.starts_with("un") || compact.starts_with("not") {
        Some("Unfurnished")
    } else {
        Some("Fully Furnished")
    }
}

/// Canonical "N Sharing" label, or None if the text is not a sharing phrase.
pub fn sharing_label(text: &str) -> Option<String> {
    let lower = text.trim().to_lowercase();
    sharing_regex()
        .captures(&lower)
        .and_then(|caps| sharing_count(&caps[1]))
}

pub fn property_type_label(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    let label = match lower.as_str() {
        "studio apartment" | "studio" | "studios" => "Studio",
        "apartment" | "apartments" | "flat" | "flats" => "Apartment",
        "independent house" | "independent houses" | "house" | "houses" => "House",
        "villa" | "villas" => "Villa",
        "pg" | "pgs" | "paying guest" | "hostel" => "PG",
        "penthouse" | "penthouses" => "Penthouse",
        "standalone building" | "standalone buildings" | "standalone" => "Standalone Building",
        _ => return None,
    };
    Some(label)
}

pub fn listing_type_label(text: &str) -> Option<&'static str> {
    let lower = text.trim().to_lowercase();
    let label = match lower.as_str() {
        "owner" | "owners" | "by owner" | "no broker" | "no brokers" | "no brokerage" => "Owner",
        "agent" | "agents" | "broker" | "brokers" | "dealer" | "dealers" => "Agent",
        "builder" | "builders" => "Builder",
        "platform" => "Platform",
        _ => return None,
    };
    Some(label)
}

fn furnishing_regex() -> &'static Regex {
    regex(&FURNISHING, || {
        r"\b(?:fully[\s-]?furnished|semi[\s-]?furnished|un[\s-]?furnished|not\s+furnished|furnished)\b"
            .to_string()
    })
}

fn sharing_regex() -> &'static Regex {
    regex(&SHARING, || {
        r"\b(\d+|single|double|triple|twin)\s*[-]?\s*(?:share|sharing)\b".to_string()
    })
}

fn property_type_regex() -> &'static Regex {
    regex(&PROPERTY_TYPE, || {
        r"\b(?:studio apartment|studios?|apartments?|flats?|independent houses?|houses?|villas?|pgs?|paying guest|hostel|penthouses?|standalone buildings?|standalone)\b"
            .to_string()
    })
}

fn listing_type_regex() -> &'static Regex {
    regex(&LISTING_TYPE, || {
        r"\b(?:no brokerage|no brokers?|by owner|owners?|agents?|brokers?|dealers?|builders?)\b"
            .to_string()
    })
}

fn sharing_count(word: &str) -> Option<String> {
    let count = match word {
        "single" => 1,
        "double" | "twin" => 2,
        "triple" => 3,
        digits => digits.parse::<u32>().ok()?,
    };
    Some(format!("{} Sharing", count))
}

fn number(caps: &Captures, group: usize) -> Option<f64> {
    caps.get(group)?.as_str().parse().ok()
}

fn whole(caps: &Captures) -> Range<usize> {
    caps.get(0).map(|m| m.range()).unwrap_or(0..0)
}

fn overlaps_any(range: &Range<usize>, others: &[Range<usize>]) -> bool {
    others
        .iter()
        .any(|other| range.start < other.end && other.start < range.end)
}
