//! Per-record classification rules.
//!
//! Each rule looks at one or two raw field values and decides which
//! counter, if any, the record contributes to. Matching is deliberately
//! fuzzy: values are lower-cased and tested for substrings, because the
//! source data spells the same category many different ways.

use crate::models::{MilkType, Treatment};
use tracing::debug;

/// Moisture percentage an organic cheese must strictly exceed.
pub const MOISTURE_THRESHOLD: f64 = 41.0;

/// Returns true if a field is absent, blank, or a textual null marker.
pub fn is_missing(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let t = v.trim();
            t.is_empty() || t.eq_ignore_ascii_case("na") || t.eq_ignore_ascii_case("null")
        }
    }
}

/// Returns the value if it is present and not a null marker.
fn present(value: Option<&str>) -> Option<&str> {
    if is_missing(value) {
        None
    } else {
        value
    }
}

/// Classify a `MilkTreatmentTypeEn` value.
///
/// "pasteur" takes precedence over "raw" so that a value mentioning both
/// counts once, as pasteurized.
pub fn classify_treatment(value: Option<&str>) -> Option<Treatment> {
    let lower = present(value)?.to_lowercase();

    if lower.contains("pasteur") {
        Some(Treatment::Pasteurized)
    } else if lower.contains("raw") {
        Some(Treatment::Raw)
    } else {
        None
    }
}

/// Returns true for an organic cheese whose moisture exceeds
/// [`MOISTURE_THRESHOLD`].
///
/// Unparseable numbers make the rule not apply; they are not errors.
pub fn is_organic_high_moisture(organic: Option<&str>, moisture: Option<&str>) -> bool {
    let (Some(organic), Some(moisture)) = (present(organic), present(moisture)) else {
        return false;
    };

    let organic = match organic.trim().parse::<i32>() {
        Ok(n) => n,
        Err(e) => {
            debug!("Skipping non-integer Organic value {:?}: {}", organic, e);
            return false;
        }
    };
    let Some(moisture) = parse_moisture(moisture.trim()) else {
        debug!("Skipping non-numeric MoisturePercent value {:?}", moisture);
        return false;
    };

    organic == 1 && moisture > MOISTURE_THRESHOLD
}

/// Parse a moisture percentage.
///
/// Non-finite values are only accepted in their spelled-out forms
/// (`Infinity`, `NaN`, optionally signed); `inf` and friends are rejected.
fn parse_moisture(text: &str) -> Option<f64> {
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() {
        return Some(value);
    }

    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    matches!(unsigned, "Infinity" | "NaN").then_some(value)
}

/// Bucket a `MilkTypeEn` value. The first matching bucket wins.
pub fn classify_milk_type(value: Option<&str>) -> Option<MilkType> {
    let lower = present(value)?.to_lowercase();

    if lower.contains("cow") {
        Some(MilkType::Cow)
    } else if lower.contains("goat") {
        Some(MilkType::Goat)
    } else if lower.contains("ewe") || lower.contains("sheep") {
        Some(MilkType::Ewe)
    } else if lower.contains("buffalo") {
        Some(MilkType::Buffalo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some("")));
        assert!(is_missing(Some("   ")));
        assert!(is_missing(Some("NA")));
        assert!(is_missing(Some(" na ")));
        assert!(is_missing(Some("Null")));
        assert!(!is_missing(Some("0")));
        assert!(!is_missing(Some("N/A")));
        assert!(!is_missing(Some("nan")));
    }

    #[test]
    fn test_classify_treatment() {
        assert_eq!(classify_treatment(Some("Pasteurized")), Some(Treatment::Pasteurized));
        assert_eq!(classify_treatment(Some("PASTEURIZED")), Some(Treatment::Pasteurized));
        assert_eq!(classify_treatment(Some("Thermised, pasteurised")), Some(Treatment::Pasteurized));
        assert_eq!(classify_treatment(Some("Raw Milk")), Some(Treatment::Raw));
        assert_eq!(classify_treatment(Some("Thermised")), None);
        assert_eq!(classify_treatment(Some("null")), None);
        assert_eq!(classify_treatment(None), None);
    }

    #[test]
    fn test_classify_treatment_pasteur_wins_over_raw() {
        assert_eq!(
            classify_treatment(Some("Raw or pasteurized")),
            Some(Treatment::Pasteurized)
        );
    }

    #[test]
    fn test_organic_moisture_boundary() {
        assert!(is_organic_high_moisture(Some("1"), Some("41.01")));
        assert!(!is_organic_high_moisture(Some("1"), Some("41.0")));
        assert!(!is_organic_high_moisture(Some("1"), Some("41")));
        assert!(!is_organic_high_moisture(Some("0"), Some("60")));
    }

    #[test]
    fn test_organic_moisture_trims_values() {
        assert!(is_organic_high_moisture(Some(" 1 "), Some(" 45.5 ")));
    }

    #[test]
    fn test_organic_moisture_unparseable_is_skipped() {
        assert!(!is_organic_high_moisture(Some("1"), Some("abc")));
        assert!(!is_organic_high_moisture(Some("yes"), Some("50")));
        assert!(!is_organic_high_moisture(Some("1.0"), Some("50")));
    }

    #[test]
    fn test_organic_moisture_non_finite() {
        assert!(!is_organic_high_moisture(Some("1"), Some("inf")));
        assert!(!is_organic_high_moisture(Some("1"), Some("+INF")));
        assert!(!is_organic_high_moisture(Some("1"), Some("infinity")));
        assert!(!is_organic_high_moisture(Some("1"), Some("nan")));
        assert!(is_organic_high_moisture(Some("1"), Some("Infinity")));
        assert!(!is_organic_high_moisture(Some("1"), Some("-Infinity")));
        assert!(!is_organic_high_moisture(Some("1"), Some("NaN")));
    }

    #[test]
    fn test_parse_moisture() {
        assert_eq!(parse_moisture("41.5"), Some(41.5));
        assert_eq!(parse_moisture("-3"), Some(-3.0));
        assert_eq!(parse_moisture("inf"), None);
        assert_eq!(parse_moisture("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_moisture("abc"), None);
    }

    #[test]
    fn test_organic_moisture_missing_is_skipped() {
        assert!(!is_organic_high_moisture(None, Some("50")));
        assert!(!is_organic_high_moisture(Some("1"), Some("NA")));
        assert!(!is_organic_high_moisture(Some("1"), Some("")));
    }

    #[test]
    fn test_classify_milk_type() {
        assert_eq!(classify_milk_type(Some("Cow")), Some(MilkType::Cow));
        assert_eq!(classify_milk_type(Some("Goat")), Some(MilkType::Goat));
        assert_eq!(classify_milk_type(Some("Ewe")), Some(MilkType::Ewe));
        assert_eq!(classify_milk_type(Some("Sheep's milk")), Some(MilkType::Ewe));
        assert_eq!(classify_milk_type(Some("Water Buffalo")), Some(MilkType::Buffalo));
        assert_eq!(classify_milk_type(Some("Camel")), None);
        assert_eq!(classify_milk_type(Some("  ")), None);
    }

    #[test]
    fn test_classify_milk_type_first_match_wins() {
        assert_eq!(classify_milk_type(Some("Cow/Goat Blend")), Some(MilkType::Cow));
        assert_eq!(classify_milk_type(Some("Goat and Ewe")), Some(MilkType::Goat));
        assert_eq!(classify_milk_type(Some("Ewe and Buffalo")), Some(MilkType::Ewe));
    }
}
