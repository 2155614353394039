//! Salary normalizer.
//!
//! Two steps: fixed figures quoted in rupees are first rewritten to their
//! lac equivalent, then the text is parsed as a lac range or point value and
//! converted to base units.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// One lac in base currency units.
pub const LAC: f64 = 100_000.0;

const NOT_DISCLOSED: &str = "not disclosed";
const PER_ANNUM: &str = "p.a.";

/// Normalized salary triple in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl SalaryRange {
    fn from_lacs(low: f64, high: f64) -> Self {
        let min = low * LAC;
        let max = high * LAC;
        Self { min, max, average: (min + max) / 2.0 }
    }
}

/// A literal figure and the lac-denominated text replacing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySubstitution {
    pub from: String,
    pub to: String,
}

impl SalarySubstitution {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    /// Figures the raw export quotes in rupees instead of lacs.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("50,000", "0.5"),
            Self::new("60,000", "0.6"),
            Self::new("70,000", "0.7"),
        ]
    }
}

/// Compiled whole-word substitution table.
#[derive(Debug, Clone)]
pub struct SalarySubstituter {
    rules: Vec<(Regex, String)>,
}

impl SalarySubstituter {
    /// Compile the table. A figure only matches when it is not part of a
    /// longer number, so `"1,50,000"` is left alone.
    pub fn new(substitutions: &[SalarySubstitution]) -> ConfigResult<Self> {
        let rules = substitutions
            .iter()
            .map(|s| {
                let pattern = format!(r"(^|[^\d,.]){}", regex::escape(&s.from));
                Regex::new(&pattern)
                    .map(|re| (re, s.to.clone()))
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: s.from.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Apply every substitution in table order.
    ///
    /// The character after a figure is checked but not consumed, so it can
    /// open the next match (`"50,000-50,000"`).
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, replacement) in &self.rules {
            let current = out.as_str();
            let replaced = re
                .replace_all(current, |caps: &regex::Captures| {
                    let end = caps.get(0).map_or(0, |m| m.end());
                    if current[end..].starts_with(is_number_char) {
                        caps[0].to_string()
                    } else {
                        format!("{}{}", &caps[1], replacement)
                    }
                })
                .into_owned();
            out = replaced;
        }
        out
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == ',' || c == '.'
}

/// Parse a salary string in lacs into base units.
///
/// Returns `None` for undisclosed salaries and for anything that does not
/// reduce to one or two numbers.
pub fn parse_salary(text: &str) -> Option<SalaryRange> {
    let lower = text.to_lowercase();
    if lower.contains(NOT_DISCLOSED) {
        return None;
    }

    let cleaned = lower
        .replace(PER_ANNUM, "")
        .replace(',', "")
        .replace("lacs", "")
        .replace("lac", "");
    let cleaned = cleaned.trim();

    if cleaned.contains('-') {
        let parts: Vec<&str> = cleaned.split('-').collect();
        if parts.len() != 2 {
            return None;
        }
        let low = parse_amount(parts[0])?;
        let high = parse_amount(parts[1])?;
        Some(SalaryRange::from_lacs(low, high))
    } else {
        let value = parse_amount(cleaned)?;
        Some(SalaryRange::from_lacs(value, value))
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
