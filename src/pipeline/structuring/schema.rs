//! Canonical response schemas.
//!
//! A schema is the ordered list of section headings a review response is
//! expected to follow, plus the ordered field list of a suspicious-item row
//! and which of those fields must be non-empty. The parsing code never knows
//! these lists itself: callers pick a built-in [`SchemaVersion`] or supply a
//! custom [`CanonicalSchema`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Heading that introduces the delimited item block.
pub const SENTINEL_MARKER: &str = "SUSPICIOUS ITEMS:";

/// Exact item-block content meaning "no flagged items".
pub const SENTINEL_EMPTY: &str = "None found.";

/// Separator between the fields of one item row.
pub const FIELD_SEPARATOR: char = '|';

const FARB_FOUR_SECTIONS: &[&str] = &[
    "FAIRNESS:",
    "ACCURACY:",
    "REFLECTIVENESS:",
    "BILLING INTEGRITY:",
];

const OVERVIEW_SECTIONS: &[&str] = &[
    "OVERVIEW:",
    "FAIRNESS OF CHARGES:",
    "ACCURACY OF BILLING DETAILS:",
    "REFLECTIVENESS OF WORK DESCRIPTIONS:",
    "BILLING INTEGRITY:",
    "DISCREPANCIES AND RECOMMENDATIONS:",
];

const FULL_REPORT_SECTIONS: &[&str] = &[
    "EXECUTIVE SUMMARY:",
    "DOCUMENT ANALYSIS:",
    "FAIRNESS OF CHARGES:",
    "ACCURACY OF BILLING DETAILS:",
    "REFLECTIVENESS OF WORK DESCRIPTIONS:",
    "BILLING INTEGRITY:",
    "CLIENT-SPECIFIC RECOMMENDATIONS:",
    "PREVENTATIVE STRATEGIES:",
    "FINANCIAL IMPACT ANALYSIS:",
    "FARB RATING:",
    "ANALYSIS LIMITATIONS AND NEXT STEPS:",
    "CONCLUSION:",
];

/// Built-in response formats, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Four FARB headings, narrative only.
    V1,
    /// Overview report with a six-field item block.
    V2,
    /// Twelve-section report, items carry a confidence.
    V3,
    /// Twelve-section report, numbered items.
    V4,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 4] = [Self::V1, Self::V2, Self::V3, Self::V4];

    pub fn label(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::V3 => "v3",
            Self::V4 => "v4",
        }
    }

    /// The canonical schema for this version.
    pub fn schema(self) -> CanonicalSchema {
        match self {
            Self::V1 => CanonicalSchema::from_parts(FARB_FOUR_SECTIONS, &[], &[]),
            Self::V2 => CanonicalSchema::from_parts(
                OVERVIEW_SECTIONS,
                &["description", "name", "rate", "quantity", "totalCost", "reason"],
                &["description", "totalCost", "reason"],
            ),
            Self::V3 => CanonicalSchema::from_parts(
                FULL_REPORT_SECTIONS,
                &[
                    "description",
                    "name",
                    "rate",
                    "quantity",
                    "totalCost",
                    "reason",
                    "confidence",
                ],
                &["description", "totalCost", "reason", "confidence"],
            ),
            Self::V4 => CanonicalSchema::from_parts(
                FULL_REPORT_SECTIONS,
                &[
                    "itemNumber",
                    "description",
                    "name",
                    "rate",
                    "quantity",
                    "totalCost",
                    "reason",
                    "confidence",
                ],
                &[
                    "itemNumber",
                    "description",
                    "name",
                    "totalCost",
                    "reason",
                    "confidence",
                ],
            ),
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered section titles and item fields of one response format.
///
/// Immutable once built; construction (including deserialization) rejects
/// schemas the structuring engine could not honour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCanonicalSchema")]
pub struct CanonicalSchema {
    section_titles: Vec<String>,
    item_fields: Vec<String>,
    required_fields: Vec<String>,
}

#[derive(Deserialize)]
struct RawCanonicalSchema {
    section_titles: Vec<String>,
    #[serde(default)]
    item_fields: Vec<String>,
    #[serde(default)]
    required_fields: Vec<String>,
}

impl TryFrom<RawCanonicalSchema> for CanonicalSchema {
    type Error = StructuringError;

    fn try_from(raw: RawCanonicalSchema) -> Result<Self, Self::Error> {
        Self::new(raw.section_titles, raw.item_fields, raw.required_fields)
    }
}

impl CanonicalSchema {
    /// Build a validated schema.
    ///
    /// Titles must be non-blank and unique ignoring case (matching is
    /// case-insensitive). Field names must be non-blank and unique, and every
    /// required field must be one of the item fields.
    pub fn new(
        section_titles: Vec<String>,
        item_fields: Vec<String>,
        required_fields: Vec<String>,
    ) -> Result<Self, StructuringError> {
        if section_titles.is_empty() {
            return Err(StructuringError::InvalidSchema(
                "at least one section title is required".into(),
            ));
        }

        let mut seen_titles = HashSet::new();
        for title in &section_titles {
            if title.trim().is_empty() {
                return Err(StructuringError::InvalidSchema("blank section title".into()));
            }
            if !seen_titles.insert(title.trim().to_lowercase()) {
                return Err(StructuringError::InvalidSchema(format!(
                    "duplicate section title '{title}'"
                )));
            }
        }

        let mut seen_fields = HashSet::new();
        for field in &item_fields {
            if field.trim().is_empty() {
                return Err(StructuringError::InvalidSchema("blank item field name".into()));
            }
            if !seen_fields.insert(field.as_str()) {
                return Err(StructuringError::InvalidSchema(format!(
                    "duplicate item field '{field}'"
                )));
            }
        }

        let mut seen_required = HashSet::new();
        for field in &required_fields {
            if !seen_fields.contains(field.as_str()) {
                return Err(StructuringError::InvalidSchema(format!(
                    "required field '{field}' is not an item field"
                )));
            }
            if !seen_required.insert(field.as_str()) {
                return Err(StructuringError::InvalidSchema(format!(
                    "required field '{field}' listed twice"
                )));
            }
        }

        Ok(Self {
            section_titles,
            item_fields,
            required_fields,
        })
    }

    /// Built-in schemas only; their lists are checked by tests.
    fn from_parts(titles: &[&str], fields: &[&str], required: &[&str]) -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            section_titles: owned(titles),
            item_fields: owned(fields),
            required_fields: owned(required),
        }
    }

    pub fn section_titles(&self) -> &[String] {
        &self.section_titles
    }

    pub fn item_fields(&self) -> &[String] {
        &self.item_fields
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Whether responses in this format end with a delimited item block.
    pub fn has_item_block(&self) -> bool {
        !self.item_fields.is_empty()
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn builtin_schemas_pass_validation() {
        for version in SchemaVersion::ALL {
            let schema = version.schema();
            let rebuilt = CanonicalSchema::new(
                schema.section_titles().to_vec(),
                schema.item_fields().to_vec(),
                schema.required_fields().to_vec(),
            );
            assert!(rebuilt.is_ok(), "{version} failed validation: {rebuilt:?}");
        }
    }

    #[test]
    fn builtin_schema_shapes() {
        assert_eq!(SchemaVersion::V1.schema().section_titles().len(), 4);
        assert!(!SchemaVersion::V1.schema().has_item_block());

        let v2 = SchemaVersion::V2.schema();
        assert_eq!(v2.section_titles().len(), 6);
        assert_eq!(v2.item_fields().len(), 6);

        let v3 = SchemaVersion::V3.schema();
        assert_eq!(v3.section_titles().len(), 12);
        assert_eq!(v3.item_fields().last().map(String::as_str), Some("confidence"));

        let v4 = SchemaVersion::V4.schema();
        assert_eq!(v4.section_titles(), v3.section_titles());
        assert_eq!(v4.item_fields().len(), 8);
        assert_eq!(v4.item_fields()[0], "itemNumber");
        assert!(v4.is_required("name"));
        assert!(!v4.is_required("rate"));
    }

    #[test]
    fn rejects_empty_title_list() {
        let result = CanonicalSchema::new(vec![], vec![], vec![]);
        assert!(matches!(result, Err(StructuringError::InvalidSchema(_))));
    }

    #[test]
    fn rejects_titles_differing_only_in_case() {
        let result = CanonicalSchema::new(strings(&["Summary:", "SUMMARY:"]), vec![], vec![]);
        assert!(matches!(result, Err(StructuringError::InvalidSchema(_))));
    }

    #[test]
    fn rejects_required_field_outside_item_fields() {
        let result = CanonicalSchema::new(
            strings(&["SUMMARY:"]),
            strings(&["description"]),
            strings(&["totalCost"]),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("totalCost"));
    }

    #[test]
    fn rejects_duplicate_and_blank_fields() {
        assert!(CanonicalSchema::new(
            strings(&["SUMMARY:"]),
            strings(&["a", "a"]),
            vec![]
        )
        .is_err());
        assert!(CanonicalSchema::new(strings(&["SUMMARY:"]), strings(&[" "]), vec![]).is_err());
    }

    #[test]
    fn deserializes_and_validates_custom_schema() {
        let json = r#"{
            "section_titles": ["SUMMARY:", "FINDINGS:"],
            "item_fields": ["description", "totalCost"],
            "required_fields": ["totalCost"]
        }"#;
        let schema: CanonicalSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.section_titles().len(), 2);
        assert!(schema.is_required("totalCost"));

        let bad = r#"{"section_titles": ["SUMMARY:"], "required_fields": ["reason"]}"#;
        assert!(serde_json::from_str::<CanonicalSchema>(bad).is_err());
    }

    #[test]
    fn version_labels_round_trip_through_serde() {
        for version in SchemaVersion::ALL {
            let json = serde_json::to_string(&version).unwrap();
            assert_eq!(json, format!("\"{}\"", version.label()));
            let back: SchemaVersion = serde_json::from_str(&json).unwrap();
            assert_eq!(back, version);
        }
    }
}
