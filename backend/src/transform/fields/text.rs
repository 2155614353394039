//! Company name sanitizer and rating normalizer.

use serde_json::Value;
use std::collections::BTreeMap;

/// Remove the boilerplate marker from a company name and trim it.
///
/// The marker match is exact and case-sensitive. `None` passes through.
pub fn sanitize_company(text: Option<&str>, marker: &str) -> Option<String> {
    text.map(|s| {
        if marker.is_empty() {
            s.trim().to_string()
        } else {
            s.replace(marker, "").trim().to_string()
        }
    })
}

/// Round a rating to one decimal place.
pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// Read a rating cell. Accepts numbers and numeric text.
pub fn parse_rating(value: &Value) -> Option<f64> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    rating.is_finite().then_some(rating)
}

/// Most frequent rounded rating. Ties go to the lowest rating.
pub fn rating_mode(ratings: &[f64]) -> Option<f64> {
    // Keyed in tenths so the rounded values compare exactly
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for r in ratings {
        *counts.entry((round_rating(*r) * 10.0).round() as i64).or_default() += 1;
    }

    let mut best: Option<(i64, usize)> = None;
    for (tenths, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((tenths, count));
        }
    }
    best.map(|(tenths, _)| tenths as f64 / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_company() {
        assert_eq!(
            sanitize_company(Some("  Hiring for Acme Corp "), "Hiring for"),
            Some("Acme Corp".to_string())
        );
        // Case-sensitive marker
        assert_eq!(
            sanitize_company(Some("hiring for Acme"), "Hiring for"),
            Some("hiring for Acme".to_string())
        );
        assert_eq!(sanitize_company(None, "Hiring for"), None);
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(3.86), 3.9);
        assert_eq!(round_rating(4.0), 4.0);
        assert_eq!(round_rating(2.04), 2.0);
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(&json!(3.9)), Some(3.9));
        assert_eq!(parse_rating(&json!(" 4.12 ")), Some(4.12));
        assert_eq!(parse_rating(&json!("n/a")), None);
        assert_eq!(parse_rating(&Value::Null), None);
    }

    #[test]
    fn test_rating_mode() {
        assert_eq!(rating_mode(&[3.9, 4.1, 3.88, 4.0]), Some(3.9));
        // Tie between 3.5 and 4.5
        assert_eq!(rating_mode(&[4.5, 3.5]), Some(3.5));
        assert_eq!(rating_mode(&[]), None);
    }
}
