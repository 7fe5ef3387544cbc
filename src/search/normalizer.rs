//! Query text normalization.
//!
//! The rewrite steps run once each, in a fixed order. Later steps see the
//! output of earlier ones ("thousand" becomes "k" before "25k" is expanded),
//! so reordering them changes what the extractor receives.

use regex::{Captures, Regex};
use std::sync::OnceLock;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static DIGIT_GROUPS: OnceLock<Regex> = OnceLock::new();
static RUPEES: OnceLock<Regex> = OnceLock::new();
static THOUSAND: OnceLock<Regex> = OnceLock::new();
static THOUSANDS_SUFFIX: OnceLock<Regex> = OnceLock::new();
static NUMBER_RUPEES: OnceLock<Regex> = OnceLock::new();
static COPULA: OnceLock<Regex> = OnceLock::new();
static SQUARE_FEET: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("normalizer pattern is valid"))
}

/// Rewrite a raw search-box string into the canonical token string the
/// criteria extractor understands.
pub fn normalize(raw: &str) -> String {
    // 1. trim, lowercase, collapse runs of whitespace and digit grouping
    //    ("25,000" and "1,20,000" -> "25000" and "120000")
    let text = raw.trim().to_lowercase();
    let text = regex(&WHITESPACE, r"\s+").replace_all(&text, " ");
    let text = regex(&DIGIT_GROUPS, r"\b\d{1,3}(?:,\d{2,3})+\b")
        .replace_all(&text, |caps: &Captures| caps[0].replace(',', ""));

    // 2. rupees -> rs
    let text = regex(&RUPEES, r"\brupees\b").replace_all(&text, "rs");

    // 3. thousand -> k
    let text = regex(&THOUSAND, r"\bthousand\b").replace_all(&text, "k");

    // 4. 25k / 25 k / 2.5k -> 25000 / 25000 / 2500
    let text = regex(&THOUSANDS_SUFFIX, r"\b(\d+(?:\.\d+)?)\s*k\b")
        .replace_all(&text, |caps: &Captures| expand_thousands(&caps[1]));

    // 5. 25000 rupees / 25000 rs -> 25000. Step 2 already turned "rupees" into "rs".
    let text = regex(&NUMBER_RUPEES, r"\b(\d+(?:\.\d+)?)\s*(?:rupees|rs)\b\.?")
        .replace_all(&text, "$1");

    // 6. "price is 5000" -> "price 5000"
    let text = regex(&COPULA, r"\b(price|cost|rent) is\b").replace_all(&text, "$1");

    // 7. square feet / sq ft / sq. ft. / square ft -> sqft
    let text = regex(&SQUARE_FEET, r"(?:square|sq)\.?\s*(?:feet|foot|ft)\b\.?")
        .replace_all(&text, "sqft");

    text.into_owned()
}

fn expand_thousands(numeral: &str) -> String {
    match numeral.parse::<f64>() {
        Ok(value) => {
            let expanded = (value * 1000.0).round();
            format!("{}", expanded as u64)
        }
        Err(_) => numeral.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_lowercase() {
        assert_eq!(normalize("  Apartment   In KORAMANGALA "), "apartment in koramangala");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_digit_grouping_is_collapsed() {
        assert_eq!(normalize("under 25,000"), "under 25000");
        assert_eq!(normalize("1,20,000 rupees"), "120000");
        assert_eq!(normalize("Rs. 1,500,000"), "rs. 1500000");
        assert_eq!(normalize("koramangala, bangalore"), "koramangala, bangalore");
    }

    #[test]
    fn test_thousands_expansion() {
        assert_eq!(normalize("25k"), "25000");
        assert_eq!(normalize("25 K"), "25000");
        assert_eq!(normalize("under 30 thousand"), "under 30000");
        assert_eq!(normalize("2.5k"), "2500");
    }

    #[test]
    fn test_stray_k_is_left_alone() {
        assert_eq!(normalize("k block"), "k block");
        assert_eq!(normalize("25kg"), "25kg");
    }

    #[test]
    fn test_rupee_words_are_dropped_after_numbers() {
        assert_eq!(normalize("20000 rupees"), "20000");
        assert_eq!(normalize("15 thousand rupees"), "15000");
        assert_eq!(normalize("under 12000 rs."), "under 12000");
        assert_eq!(normalize("rupees 5000"), "rs 5000");
    }

    #[test]
    fn test_copula_is_dropped() {
        assert_eq!(normalize("rent is 15000"), "rent 15000");
        assert_eq!(normalize("Price is 5k"), "price 5000");
        assert_eq!(normalize("cost is under 9000"), "cost under 9000");
    }

    #[test]
    fn test_square_feet_variants() {
        for raw in [
            "1200 square feet",
            "1200 sq feet",
            "1200 sq ft",
            "1200 square ft",
            "1200 sq. ft.",
            "1200 sqft",
        ] {
            assert_eq!(normalize(raw), "1200 sqft", "input: {}", raw);
        }
        assert_eq!(normalize("1200sq ft"), "1200sqft");
    }
}
