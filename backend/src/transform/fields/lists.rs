//! Per-value cleanup for the comma-separated `Location` and `Key Skills` cells.
//!
//! The relational part (explode, group by job, merge back) lives in
//! [`crate::transform::grouper`].

/// Drop every balanced `( ... )` span, nested spans included.
///
/// An unmatched `(` drops the rest of the text; a stray `)` is dropped.
pub fn strip_parentheticals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;

    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Normalize one location: no annotations, trimmed, lower-cased.
pub fn clean_location(part: &str) -> String {
    strip_parentheticals(part).trim().to_lowercase()
}

/// Normalize one skill: trimmed, lower-cased.
pub fn clean_skill(part: &str) -> String {
    part.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_parentheticals() {
        assert_eq!(strip_parentheticals("Bengaluru(Whitefield)"), "Bengaluru");
        assert_eq!(strip_parentheticals("Mumbai (All Areas) West"), "Mumbai  West");
        assert_eq!(strip_parentheticals("Delhi (NCR (Gurgaon))"), "Delhi ");
        assert_eq!(strip_parentheticals("Pune (unclosed"), "Pune ");
        assert_eq!(strip_parentheticals("Chennai)"), "Chennai");
    }

    #[test]
    fn test_clean_location() {
        assert_eq!(clean_location(" Bengaluru(Whitefield) "), "bengaluru");
        assert_eq!(clean_location("Hyderabad/Secunderabad"), "hyderabad/secunderabad");
    }

    #[test]
    fn test_cleaners_are_idempotent() {
        for raw in ["Bengaluru(Whitefield)", " Navi Mumbai ", "Kolkata (Salt Lake)"] {
            let once = clean_location(raw);
            assert_eq!(clean_location(&once), once);
        }
        let skill = clean_skill("  Machine Learning ");
        assert_eq!(skill, "machine learning");
        assert_eq!(clean_skill(&skill), skill);
    }
}
