//! Applications count cleaner.

use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*").expect("number pattern compiles"));

const LESS_THAN: &str = "less than";

/// Parse an applications cell.
///
/// `"less than N"` means at most `N - 1`. Anything unparseable is `None`,
/// which is kept distinct from a zero count.
pub fn parse_applications(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();

    if lower.contains(LESS_THAN) {
        let bound = FIRST_NUMBER_RE.find(&lower)?;
        return parse_count(bound.as_str())?.checked_sub(1);
    }

    parse_count(lower.trim())
}

fn parse_count(text: &str) -> Option<u32> {
    text.replace(',', "").parse::<u32>().ok()
}
