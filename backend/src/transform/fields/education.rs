//! Education parser and standardizers.
//!
//! The raw cell is a few labelled lines:
//!
//! ```text
//! UG: B.Tech/B.E. in Any Specialization
//! PG: MBA/PGDM in Marketing
//! Doctorate: Doctorate Not Required
//! ```
//!
//! [`parse_education`] splits it per level, then each level is mapped onto a
//! small closed vocabulary by an [`EducationVocabulary`]: an ordered list of
//! (patterns, tag) rules where the first rule with a pattern contained in the
//! text wins. New qualifications are added as rules, not code.

use serde::{Deserialize, Serialize};

/// Tag for missing or unrecognized qualifications.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Qualification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationLevel {
    Ug,
    Pg,
    Doctorate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 3] = [Self::Ug, Self::Pg, Self::Doctorate];

    /// Line label, lower-cased.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ug => "ug:",
            Self::Pg => "pg:",
            Self::Doctorate => "doctorate:",
        }
    }

    /// Output column.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Ug => crate::models::columns::UG,
            Self::Pg => crate::models::columns::PG,
            Self::Doctorate => crate::models::columns::DOCTORATE,
        }
    }
}

/// Raw qualification text per level, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationLevels {
    pub ug: Option<String>,
    pub pg: Option<String>,
    pub doctorate: Option<String>,
}

impl EducationLevels {
    pub fn get(&self, level: EducationLevel) -> Option<&str> {
        match level {
            EducationLevel::Ug => self.ug.as_deref(),
            EducationLevel::Pg => self.pg.as_deref(),
            EducationLevel::Doctorate => self.doctorate.as_deref(),
        }
    }

    fn set(&mut self, level: EducationLevel, value: String) {
        match level {
            EducationLevel::Ug => self.ug = Some(value),
            EducationLevel::Pg => self.pg = Some(value),
            EducationLevel::Doctorate => self.doctorate = Some(value),
        }
    }
}

/// Split the multi-line education text into its labelled levels.
///
/// Unlabelled lines are ignored. A repeated label keeps the last line.
pub fn parse_education(text: &str) -> EducationLevels {
    let mut levels = EducationLevels::default();

    for line in text.lines() {
        let line = line.trim().to_lowercase();
        for level in EducationLevel::ALL {
            if let Some(rest) = line.strip_prefix(level.prefix()) {
                levels.set(level, rest.trim().to_string());
                break;
            }
        }
    }

    levels
}

// =============================================================================
// Vocabulary
// =============================================================================

/// Maps text containing any of `patterns` (case-insensitive) to `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRule {
    pub patterns: Vec<String>,
    pub tag: String,
}

impl EducationRule {
    pub fn new(patterns: &[&str], tag: impl Into<String>) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            tag: tag.into(),
        }
    }

    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| !p.is_empty() && text.contains(&p.to_lowercase()))
    }
}

/// Ordered rule tables, one per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationVocabulary {
    pub ug: Vec<EducationRule>,
    pub pg: Vec<EducationRule>,
    pub doctorate: Vec<EducationRule>,
}

impl EducationVocabulary {
    pub fn rules(&self, level: EducationLevel) -> &[EducationRule] {
        match level {
            EducationLevel::Ug => &self.ug,
            EducationLevel::Pg => &self.pg,
            EducationLevel::Doctorate => &self.doctorate,
        }
    }

    /// Append a rule to the end of a level's table.
    pub fn push_rule(&mut self, level: EducationLevel, rule: EducationRule) {
        match level {
            EducationLevel::Ug => self.ug.push(rule),
            EducationLevel::Pg => self.pg.push(rule),
            EducationLevel::Doctorate => self.doctorate.push(rule),
        }
    }

    /// Map raw qualification text to its canonical tag. First match wins.
    pub fn standardize(&self, level: EducationLevel, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return NOT_SPECIFIED.to_string();
        };
        let text = raw.to_lowercase();
        self.rules(level)
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.tag.clone())
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    /// Every canonical tag a level can produce, sentinel included.
    pub fn tags(&self, level: EducationLevel) -> Vec<&str> {
        let mut tags: Vec<&str> = self.rules(level).iter().map(|r| r.tag.as_str()).collect();
        tags.push(NOT_SPECIFIED);
        tags.dedup();
        tags
    }
}

impl Default for EducationVocabulary {
    fn default() -> Self {
        // "not required" leads each table so "Doctorate Not Required" is not a doctorate
        let not_required = || EducationRule::new(&["not required"], NOT_SPECIFIED);

        Self {
            ug: vec![
                not_required(),
                EducationRule::new(&["b.tech", "b.e."], "B.Tech/B.E."),
                EducationRule::new(&["b.arch"], "B.Arch"),
                EducationRule::new(&["b.pharm"], "B.Pharma"),
                EducationRule::new(&["b.sc"], "B.Sc"),
                EducationRule::new(&["b.com"], "B.Com"),
                EducationRule::new(&["bca"], "BCA"),
                EducationRule::new(&["bba", "bms"], "BBA/BMS"),
                EducationRule::new(&["b.a"], "B.A"),
                EducationRule::new(&["diploma"], "Diploma"),
                EducationRule::new(&["any graduate"], "Any Graduate"),
            ],
            pg: vec![
                not_required(),
                EducationRule::new(&["m.tech"], "M.Tech"),
                EducationRule::new(&["mba", "pgdm"], "MBA/PGDM"),
                EducationRule::new(&["mca"], "MCA"),
                EducationRule::new(&["m.sc"], "M.Sc"),
                EducationRule::new(&["m.com"], "M.Com"),
                EducationRule::new(&["m.a"], "M.A"),
                EducationRule::new(&["any postgraduate"], "Any Postgraduate"),
            ],
            doctorate: vec![
                not_required(),
                EducationRule::new(&["ph.d", "doctorate"], "Ph.D/Doctorate"),
            ],
        }
    }
}
