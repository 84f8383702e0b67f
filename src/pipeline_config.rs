//! Structuring configuration and review profiles.
//!
//! A review profile selects the response schema the upstream prompt asks for
//! and the policies the structuring engine applies to what comes back. The
//! policy knobs exist because observed response formats disagree on how to
//! treat a missing item block or a malformed row; the caller decides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::structuring::{
    CanonicalSchema, MarkerPolicy, SchemaVersion, Strictness, StructuringError,
};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Policies applied while structuring one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuringConfig {
    /// Malformed item rows: abort (`strict`) or drop (`lenient`).
    pub strictness: Strictness,
    /// Absent `SUSPICIOUS ITEMS:` heading: empty list or error.
    pub marker_policy: MarkerPolicy,
    /// Upper bound on returned items. `None` keeps every valid row.
    pub max_items: Option<usize>,
    /// Strip echoed `<n>|` line-number prefixes from narrative text.
    pub strip_line_numbers: bool,
}

impl Default for StructuringConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            marker_policy: MarkerPolicy::Optional,
            max_items: None,
            strip_line_numbers: true,
        }
    }
}

/// Built-in schema by version label, or a full custom schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSelection {
    Version(SchemaVersion),
    Custom(CanonicalSchema),
}

impl SchemaSelection {
    pub fn resolve(&self) -> CanonicalSchema {
        match self {
            Self::Version(version) => version.schema(),
            Self::Custom(schema) => schema.clone(),
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Version(version) => version.label(),
            Self::Custom(_) => "custom",
        }
    }
}

impl Default for SchemaSelection {
    fn default() -> Self {
        Self::Version(SchemaVersion::V4)
    }
}

/// Schema choice plus structuring policies, as stored in a profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewProfile {
    pub schema: SchemaSelection,
    pub structuring: StructuringConfig,
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl ReviewProfile {
    pub fn from_json_str(json: &str) -> Result<Self, StructuringError> {
        serde_json::from_str(json).map_err(|e| StructuringError::JsonParsing(e.to_string()))
    }

    /// Load a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StructuringError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json).map_err(|e| {
            StructuringError::Config(format!("{}: {e}", path.display()))
        })
    }

    /// Load a profile, falling back to the default when the file is absent.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, StructuringError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No review profile found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_lenient_and_unbounded() {
        let config = StructuringConfig::default();
        assert_eq!(config.strictness, Strictness::Lenient);
        assert_eq!(config.marker_policy, MarkerPolicy::Optional);
        assert_eq!(config.max_items, None);
        assert!(config.strip_line_numbers);
    }

    #[test]
    fn default_profile_uses_v4() {
        let profile = ReviewProfile::default();
        assert_eq!(profile.schema, SchemaSelection::Version(SchemaVersion::V4));
        assert_eq!(profile.schema.label(), "v4");
    }

    #[test]
    fn parses_version_profile_with_partial_config() {
        let profile = ReviewProfile::from_json_str(
            r#"{"schema": "v2", "structuring": {"strictness": "strict", "max_items": 20}}"#,
        )
        .unwrap();
        assert_eq!(profile.schema.resolve(), SchemaVersion::V2.schema());
        assert_eq!(profile.structuring.strictness, Strictness::Strict);
        assert_eq!(profile.structuring.max_items, Some(20));
        assert_eq!(profile.structuring.marker_policy, MarkerPolicy::Optional);
        assert!(profile.structuring.strip_line_numbers);
    }

    #[test]
    fn parses_custom_schema_profile() {
        let profile = ReviewProfile::from_json_str(
            r#"{
                "schema": {
                    "section_titles": ["SUMMARY:", "FINDINGS:"],
                    "item_fields": ["description", "totalCost"],
                    "required_fields": ["description"]
                },
                "structuring": {"marker_policy": "required"}
            }"#,
        )
        .unwrap();
        assert_eq!(profile.schema.label(), "custom");
        assert_eq!(profile.schema.resolve().section_titles().len(), 2);
        assert_eq!(profile.structuring.marker_policy, MarkerPolicy::Required);
    }

    #[test]
    fn rejects_unknown_version_and_invalid_custom_schema() {
        assert!(ReviewProfile::from_json_str(r#"{"schema": "v9"}"#).is_err());
        let invalid = r#"{"schema": {"section_titles": []}}"#;
        assert!(matches!(
            ReviewProfile::from_json_str(invalid),
            Err(StructuringError::JsonParsing(_))
        ));
    }

    #[test]
    fn load_reads_profile_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"schema": "v3"}}"#).unwrap();
        let profile = ReviewProfile::load(file.path()).unwrap();
        assert_eq!(profile.schema, SchemaSelection::Version(SchemaVersion::V3));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let profile = ReviewProfile::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(profile, ReviewProfile::default());
    }

    #[test]
    fn load_or_default_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = ReviewProfile::load_or_default(&path).unwrap_err();
        assert!(matches!(err, StructuringError::Config(_)));
    }
}
