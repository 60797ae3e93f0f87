//! Threshold classification of a leaf's mean quality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::import::Record;

/// Foreground used when a matched rule does not name one.
pub const DEFAULT_FOREGROUND: &str = "black";

/// One entry of a color rule list, as configured.
///
/// `rule` is either empty (the default entry) or an operator (`>`, `=`, `<`)
/// followed by a numeric threshold, e.g. `>80`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    #[serde(default)]
    pub rule: String,
    pub bg_color: String,
    #[serde(default)]
    pub fg_color: String,
}

impl ColorRule {
    #[must_use]
    pub fn new(rule: impl Into<String>, bg_color: impl Into<String>, fg_color: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            bg_color: bg_color.into(),
            fg_color: fg_color.into(),
        }
    }

    /// Whether this is the catch-all entry.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.rule.trim().is_empty()
    }
}

/// Parses `RULE:BG[:FG]`, e.g. `>80:green`, `<20:red:white`, `:gray:black`.
impl FromStr for ColorRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let rule = parts.next().unwrap_or_default().trim();
        let bg = parts.next().map(str::trim).unwrap_or_default();
        let fg = parts.next().map(str::trim).unwrap_or_default();
        if bg.is_empty() {
            return Err(Error::InvalidColorRule {
                index: 0,
                rule: s.to_string(),
                reason: "expected RULE:BG[:FG] with a background color".to_string(),
            });
        }
        Ok(Self::new(rule, bg, fg))
    }
}

/// Comparison operator of a threshold rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Equal,
    Less,
}

impl Comparison {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Self::Greater),
            '=' => Some(Self::Equal),
            '<' => Some(Self::Less),
            _ => None,
        }
    }

    /// Whether `value <op> threshold` holds.
    #[must_use]
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Greater => value > threshold,
            Self::Equal => value == threshold,
            Self::Less => value < threshold,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Greater => ">",
            Self::Equal => "=",
            Self::Less => "<",
        })
    }
}

/// Background and foreground chosen for a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellColors {
    pub bg: String,
    pub fg: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Threshold {
    comparison: Comparison,
    value: f64,
}

/// A validated color rule list: threshold rules followed by one default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorRule>", into = "Vec<ColorRule>")]
pub struct ColorRules {
    entries: Vec<ColorRule>,
    thresholds: Vec<Threshold>,
}

impl ColorRules {
    /// Validate a rule list.
    ///
    /// The list must end with exactly one default (empty rule) entry and every
    /// other entry must parse as an operator plus a numeric threshold.
    pub fn new(entries: Vec<ColorRule>) -> Result<Self> {
        let Some(last) = entries.last() else {
            return Err(Error::MissingDefaultRule);
        };
        if !last.is_default() {
            return Err(Error::MissingDefaultRule);
        }
        if last.bg_color.trim().is_empty() {
            return Err(Error::InvalidColorRule {
                index: entries.len(),
                rule: last.rule.clone(),
                reason: "default background color is empty".to_string(),
            });
        }

        let mut thresholds = Vec::with_capacity(entries.len() - 1);
        for (i, entry) in entries[..entries.len() - 1].iter().enumerate() {
            let invalid = |reason: &str| Error::InvalidColorRule {
                index: i + 1,
                rule: entry.rule.clone(),
                reason: reason.to_string(),
            };

            let rule = entry.rule.trim();
            let mut chars = rule.chars();
            let Some(op) = chars.next() else {
                return Err(invalid("default entry must be the last one"));
            };
            let comparison =
                Comparison::from_char(op).ok_or_else(|| invalid("operator must be '>', '=' or '<'"))?;
            let value: f64 = chars
                .as_str()
                .trim()
                .parse()
                .map_err(|_| invalid("threshold is not a number"))?;
            if entry.bg_color.trim().is_empty() {
                return Err(invalid("background color is empty"));
            }

            thresholds.push(Threshold { comparison, value });
        }

        Ok(Self {
            entries,
            thresholds,
        })
    }

    /// Configured entries, default last.
    #[must_use]
    pub fn entries(&self) -> &[ColorRule] {
        &self.entries
    }

    /// The catch-all entry.
    #[must_use]
    pub fn default_rule(&self) -> &ColorRule {
        // new() guarantees a non-empty list
        &self.entries[self.entries.len() - 1]
    }

    /// Colors for a quality value; `None` falls through to the default entry.
    #[must_use]
    pub fn colors_for(&self, quality: Option<f64>) -> CellColors {
        let matched = quality.and_then(|q| {
            self.thresholds
                .iter()
                .zip(&self.entries)
                .find(|(t, _)| t.comparison.holds(q, t.value))
                .map(|(_, entry)| entry)
        });
        let entry = matched.unwrap_or_else(|| self.default_rule());

        let fg = if entry.fg_color.trim().is_empty() {
            DEFAULT_FOREGROUND.to_string()
        } else {
            entry.fg_color.clone()
        };
        CellColors {
            bg: entry.bg_color.clone(),
            fg,
        }
    }

    /// Colors for a leaf, from the mean quality of its records.
    #[must_use]
    pub fn classify(&self, records: &[&Record]) -> CellColors {
        self.colors_for(mean_quality(records))
    }
}

impl TryFrom<Vec<ColorRule>> for ColorRules {
    type Error = Error;

    fn try_from(entries: Vec<ColorRule>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<ColorRules> for Vec<ColorRule> {
    fn from(rules: ColorRules) -> Self {
        rules.entries
    }
}

/// Arithmetic mean of the defined quality values, `None` when there are none.
#[must_use]
pub fn mean_quality(records: &[&Record]) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter_map(|r| r.quality)
        .fold((0.0, 0usize), |(sum, n), q| (sum + q, n + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic_light() -> ColorRules {
        ColorRules::new(vec![
            ColorRule::new(">80", "green", ""),
            ColorRule::new("<20", "red", "white"),
            ColorRule::new("", "gray", "black"),
        ])
        .unwrap()
    }

    fn leaf(qualities: &[Option<f64>]) -> Vec<Record> {
        qualities
            .iter()
            .map(|&q| Record::new(["x"], 1.0, q))
            .collect()
    }

    #[test]
    fn test_high_quality_is_green_with_black_text() {
        let records = leaf(&[Some(90.0)]);
        let refs: Vec<&Record> = records.iter().collect();
        let colors = traffic_light().classify(&refs);
        assert_eq!(colors.bg, "green");
        assert_eq!(colors.fg, "black");
    }

    #[test]
    fn test_matched_rule_overrides_foreground() {
        let colors = traffic_light().colors_for(Some(5.0));
        assert_eq!(colors, CellColors { bg: "red".into(), fg: "white".into() });
    }

    #[test]
    fn test_no_match_uses_default() {
        let colors = traffic_light().colors_for(Some(50.0));
        assert_eq!(colors.bg, "gray");
        assert_eq!(colors.fg, "black");
    }

    #[test]
    fn test_undefined_quality_uses_default() {
        let records = leaf(&[None, None]);
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(mean_quality(&refs), None);
        assert_eq!(traffic_light().classify(&refs).bg, "gray");
    }

    #[test]
    fn test_mean_skips_missing_and_ignores_order() {
        let records = leaf(&[Some(70.0), None, Some(100.0)]);
        let mut refs: Vec<&Record> = records.iter().collect();
        assert_eq!(mean_quality(&refs), Some(85.0));
        assert_eq!(traffic_light().classify(&refs).bg, "green");

        refs.reverse();
        assert_eq!(mean_quality(&refs), Some(85.0));
        assert_eq!(traffic_light().classify(&refs).bg, "green");
    }

    #[test]
    fn test_equal_rule_and_first_match_wins() {
        let rules = ColorRules::new(vec![
            ColorRule::new("=50", "yellow", ""),
            ColorRule::new(">10", "blue", ""),
            ColorRule::new("", "gray", ""),
        ])
        .unwrap();
        assert_eq!(rules.colors_for(Some(50.0)).bg, "yellow");
        assert_eq!(rules.colors_for(Some(51.0)).bg, "blue");
    }

    #[test]
    fn test_rejects_missing_default() {
        let err = ColorRules::new(vec![ColorRule::new(">1", "red", "")]).unwrap_err();
        assert!(matches!(err, Error::MissingDefaultRule));
        assert!(matches!(ColorRules::new(vec![]), Err(Error::MissingDefaultRule)));
    }

    #[test]
    fn test_rejects_bad_threshold_naming_rule() {
        let err = ColorRules::new(vec![
            ColorRule::new(">1", "red", ""),
            ColorRule::new(">high", "green", ""),
            ColorRule::new("", "gray", ""),
        ])
        .unwrap_err();
        match err {
            Error::InvalidColorRule { index, rule, .. } => {
                assert_eq!(index, 2);
                assert_eq!(rule, ">high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_early_default_and_unknown_operator() {
        let early = ColorRules::new(vec![
            ColorRule::new("", "gray", ""),
            ColorRule::new("", "white", ""),
        ]);
        assert!(matches!(early, Err(Error::InvalidColorRule { index: 1, .. })));

        let unknown = ColorRules::new(vec![
            ColorRule::new("!5", "red", ""),
            ColorRule::new("", "gray", ""),
        ]);
        assert!(matches!(unknown, Err(Error::InvalidColorRule { index: 1, .. })));
    }

    #[test]
    fn test_rejects_default_without_background() {
        let err = ColorRules::new(vec![
            ColorRule::new(">1", "red", ""),
            ColorRule::new("", " ", "white"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidColorRule { index: 2, .. }));
        assert!(ColorRules::new(vec![ColorRule::new("", "", "")]).is_err());
    }

    #[test]
    fn test_parse_rule_argument() {
        let rule: ColorRule = "<20:red:white".parse().unwrap();
        assert_eq!(rule, ColorRule::new("<20", "red", "white"));

        let default: ColorRule = ":gray".parse().unwrap();
        assert!(default.is_default());
        assert_eq!(default.fg_color, "");

        assert!(">5".parse::<ColorRule>().is_err());
    }

    #[test]
    fn test_serde_validates() {
        let json = r#"[{"rule": ">80", "bg_color": "green"}, {"bg_color": "gray"}]"#;
        let rules: ColorRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.entries().len(), 2);

        let bad = r#"[{"rule": ">80", "bg_color": "green"}]"#;
        assert!(serde_json::from_str::<ColorRules>(bad).is_err());
    }
}
