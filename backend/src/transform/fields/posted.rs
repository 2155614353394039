//! Relative-date resolver for "posted N days ago" text.

use chrono::{Days, NaiveDate};

/// Day count used for "30+ days ago".
pub const OVER_THIRTY_DAYS: u32 = 31;

const OVER_THIRTY_MARKER: &str = "30+";
const SUFFIXES: [&str; 2] = ["days ago", "day ago"];

/// Parse `"<n> days ago"` / `"<n> day ago"` / `"30+ days ago"` into a day count.
///
/// Anything else (`"Just Now"`, `"Today"`, ...) is `None`; the pipeline
/// treats that as zero days.
pub fn parse_days_ago(text: &str) -> Option<u32> {
    if text.contains(OVER_THIRTY_MARKER) {
        return Some(OVER_THIRTY_DAYS);
    }

    let lower = text.trim().to_lowercase();
    let remainder = SUFFIXES
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(lower.as_str())
        .trim();

    if !remainder.is_empty() && remainder.chars().all(|c| c.is_ascii_digit()) {
        remainder.parse::<u32>().ok()
    } else {
        None
    }
}

/// The calendar date `days` before the reference date, or `None` when that
/// date is out of chrono's range.
pub fn resolve_posted_date(reference: NaiveDate, days: u32) -> Option<NaiveDate> {
    reference.checked_sub_days(Days::new(u64::from(days)))
}
