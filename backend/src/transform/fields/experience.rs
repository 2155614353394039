//! Experience range parser.
//!
//! Listings state experience as `"<low> - <high> years"` or `"<n> years"`.
//! Anything else makes the pipeline drop the row.

use once_cell::sync::Lazy;
use regex::Regex;

static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\d{1,2}(?: - \d{1,2})? years$").expect("experience pattern compiles")
});

const RANGE_SEPARATOR: &str = " - ";
const YEARS_SUFFIX: &str = "years";

/// Parsed experience bounds in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceRange {
    pub min: u32,
    /// `0` when only one value was given.
    pub max: u32,
}

/// Whether the text has one of the two accepted shapes.
pub fn matches_experience(text: &str) -> bool {
    EXPERIENCE_RE.is_match(text.trim())
}

/// Parse an experience string, or `None` if the row should be dropped.
///
/// A single value yields `max == 0`, not `max == min`.
pub fn parse_experience(text: &str) -> Option<ExperienceRange> {
    let text = text.trim();
    if !matches_experience(text) {
        return None;
    }

    let lower = text.to_lowercase();
    let mut parts = lower.split(RANGE_SEPARATOR);
    let min = parse_years(parts.next()?)?;
    let max = match parts.next() {
        Some(part) => parse_years(part)?,
        None => 0,
    };

    Some(ExperienceRange { min, max })
}

/// Float-then-int coercion: fractions truncate.
fn parse_years(part: &str) -> Option<u32> {
    let number = part.trim().trim_end_matches(YEARS_SUFFIX).trim();
    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.trunc() as u32)
}
