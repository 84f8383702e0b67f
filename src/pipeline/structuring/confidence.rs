use serde::Serialize;

use super::types::FlaggedItem;

/// Field name carrying the model's confidence in a flagged item.
pub const CONFIDENCE_FIELD: &str = "confidence";

/// Score thresholds for numeric confidence values
pub mod confidence_thresholds {
    /// At or above this: high confidence
    pub const HIGH: f32 = 0.80;

    /// At or above this: medium confidence
    pub const MEDIUM: f32 = 0.50;
}

/// Bucketed confidence of a flagged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    /// Field absent, empty, or not understood.
    Unspecified,
}

impl ConfidenceLevel {
    fn from_score(score: f32) -> Self {
        if score >= confidence_thresholds::HIGH {
            Self::High
        } else if score >= confidence_thresholds::MEDIUM {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Interpret a free-text confidence value.
///
/// Accepts words ("High", "moderate"), percentages ("85%"), fractions of one
/// ("0.85"), scores out of 100 ("85") and ratios ("8/10").
pub fn parse_confidence(raw: &str) -> ConfidenceLevel {
    let value = raw
        .trim()
        .trim_end_matches(['.', '!'])
        .trim()
        .to_lowercase();

    match value.as_str() {
        "" => return ConfidenceLevel::Unspecified,
        "high" | "very high" => return ConfidenceLevel::High,
        "medium" | "moderate" => return ConfidenceLevel::Medium,
        "low" | "very low" => return ConfidenceLevel::Low,
        _ => {}
    }

    parse_score(&value)
        .filter(|score| (0.0..=1.0).contains(score))
        .map(ConfidenceLevel::from_score)
        .unwrap_or(ConfidenceLevel::Unspecified)
}

/// Numeric confidence normalized to 0.0–1.0.
fn parse_score(value: &str) -> Option<f32> {
    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|p| p / 100.0);
    }

    if let Some((num, den)) = value.split_once('/') {
        let num: f32 = num.trim().parse().ok()?;
        let den: f32 = den.trim().parse().ok()?;
        return (den > 0.0).then(|| num / den);
    }

    let score: f32 = value.parse().ok()?;
    if score > 1.0 {
        Some(score / 100.0)
    } else {
        Some(score)
    }
}

impl FlaggedItem {
    /// Confidence bucket of this item, `Unspecified` for schemas without a
    /// confidence field.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.get(CONFIDENCE_FIELD)
            .map(parse_confidence)
            .unwrap_or(ConfidenceLevel::Unspecified)
    }
}
