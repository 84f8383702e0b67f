//! Output forms of a structured review: the `{analysis, suspiciousItems}`
//! response body, an item summary, and the plain-text share export.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::confidence::ConfidenceLevel;
use super::types::{FlaggedItem, ParseResult};
use crate::config::APP_NAME;

/// Field holding an item's total charge.
const TOTAL_COST_FIELD: &str = "totalCost";

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap());

/// Response body returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis: String,
    pub suspicious_items: Vec<FlaggedItem>,
}

impl From<&ParseResult> for AnalysisResponse {
    fn from(result: &ParseResult) -> Self {
        Self {
            analysis: result.report.render(),
            suspicious_items: result.items.clone(),
        }
    }
}

/// Counts and total charge across flagged items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub total: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub unspecified_confidence: usize,
    /// Sum of every parseable `totalCost`, in cents.
    pub flagged_cost_cents: u64,
    /// Items whose `totalCost` could not be read as an amount.
    pub unpriced: usize,
}

impl ItemSummary {
    pub fn from_items(items: &[FlaggedItem]) -> Self {
        let mut summary = Self {
            total: items.len(),
            ..Self::default()
        };

        for item in items {
            match item.confidence_level() {
                ConfidenceLevel::High => summary.high_confidence += 1,
                ConfidenceLevel::Medium => summary.medium_confidence += 1,
                ConfidenceLevel::Low => summary.low_confidence += 1,
                ConfidenceLevel::Unspecified => summary.unspecified_confidence += 1,
            }

            match item.get(TOTAL_COST_FIELD).and_then(parse_amount_cents) {
                Some(cents) => {
                    summary.flagged_cost_cents = summary.flagged_cost_cents.saturating_add(cents)
                }
                None => summary.unpriced += 1,
            }
        }

        summary
    }
}

/// First money amount in `raw` ("$1,250.5" → 125050). Ignores currency
/// symbols and text around the number.
pub fn parse_amount_cents(raw: &str) -> Option<u64> {
    let found = AMOUNT.find(raw)?.as_str().replace(',', "");
    let (whole, fraction) = found.split_once('.').unwrap_or((found.as_str(), ""));
    let whole: u64 = whole.parse().ok()?;
    let cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u64>().ok()? * 10,
        _ => fraction[..2].parse::<u64>().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

/// Display label for a field name: `totalCost` → `Total Cost`.
pub fn field_label(field: &str) -> String {
    if field == "itemNumber" {
        return "Item #".to_string();
    }

    let mut label = String::with_capacity(field.len() + 4);
    for (idx, c) in field.chars().enumerate() {
        if idx == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

/// File names of the documents a review looked at.
#[derive(Debug, Clone, Default)]
pub struct DocumentNames {
    pub letter: Option<String>,
    pub invoice: Option<String>,
    pub amendment: Option<String>,
}

/// Plain-text export of a review, suitable for pasting into email.
pub fn render_share_text(result: &ParseResult, names: &DocumentNames) -> String {
    let or_missing = |name: &Option<String>| name.clone().unwrap_or_else(|| "Not provided".into());

    let mut out = String::new();
    let _ = writeln!(out, "{APP_NAME} Analysis Result");
    out.push('\n');
    out.push_str("Documents Analyzed:\n");
    let _ = writeln!(out, "1. Engagement Letter: {}", or_missing(&names.letter));
    let _ = writeln!(out, "2. Invoice: {}", or_missing(&names.invoice));
    let _ = writeln!(out, "3. Engagement Amendment: {}", or_missing(&names.amendment));
    out.push('\n');
    let _ = writeln!(out, "Detailed {APP_NAME} Analysis:");
    out.push_str(&result.report.render());
    out.push_str("\n\nSuspicious Items:\n");

    if result.items.is_empty() {
        out.push_str("None found.\n");
        return out;
    }

    let blocks: Vec<String> = result
        .items
        .iter()
        .map(|item| {
            item.fields()
                .map(|(name, value)| format!("{}: {value}\n", field_label(name)))
                .collect()
        })
        .collect();
    out.push_str(&blocks.join("\n"));
    out
}
