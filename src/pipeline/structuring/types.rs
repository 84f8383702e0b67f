use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::StructuringError;

/// Content substituted for a section the response never mentioned.
pub const PLACEHOLDER_CONTENT: &str = "No information available.";

/// One canonical section of the review: heading plus captured body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn placeholder(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: PLACEHOLDER_CONTENT.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.content == PLACEHOLDER_CONTENT
    }
}

/// Sections in schema order, one per canonical title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormattedReport {
    pub sections: Vec<Section>,
}

impl FormattedReport {
    /// Render as `"\n\n" + title + "\n" + content` per section, in order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.title);
            out.push('\n');
            out.push_str(&section.content);
        }
        out
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Titles that fell back to placeholder content.
    pub fn missing_titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.is_placeholder())
            .map(|s| s.title.as_str())
            .collect()
    }
}

impl std::fmt::Display for FormattedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// One suspicious invoice line, keyed by the schema's field names.
///
/// Values are kept in schema field order and are always trimmed. Serializes
/// as a JSON object with exactly those keys, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedItem {
    fields: Vec<(String, String)>,
}

impl FlaggedItem {
    /// Map row values onto field names by position. Values beyond the field
    /// list are dropped; missing trailing values become empty strings.
    pub fn from_row(field_names: &[String], values: &[&str]) -> Self {
        let fields = field_names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = values.get(idx).map(|v| v.trim()).unwrap_or_default();
                (name.clone(), value.to_string())
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FlaggedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Complete result of structuring one review response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub report: FormattedReport,
    pub items: Vec<FlaggedItem>,
    /// Non-fatal anomalies (dropped rows, truncation). Never contains
    /// billing content.
    pub diagnostics: Vec<String>,
}

/// What a malformed item row does to the structuring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Abort the whole call on the first malformed row.
    Strict,
    /// Drop the row, record a diagnostic, keep going.
    #[default]
    Lenient,
}

/// Whether a response must contain the suspicious-items heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// Absent heading means no flagged items.
    #[default]
    Optional,
    /// Absent heading is a `MissingItemBlock` error (only for schemas that
    /// declare item fields).
    Required,
}

/// Extracted document texts fed into the review prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDocuments {
    /// Engagement letter. Blank means invoice-only review.
    pub letter: String,
    pub invoice: String,
    pub amendment: Option<String>,
}

impl ReviewDocuments {
    pub fn is_invoice_only(&self) -> bool {
        self.letter.trim().is_empty()
    }
}

/// Upstream generative-text service (allows mocking).
pub trait CompletionClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, StructuringError>;
}

/// Runs a full billing review: prompt, upstream call, structuring.
pub trait BillingAnalyzer {
    fn review(
        &self,
        review_id: &Uuid,
        documents: &ReviewDocuments,
    ) -> Result<ParseResult, StructuringError>;
}
