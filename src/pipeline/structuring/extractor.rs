use super::schema::{CanonicalSchema, FIELD_SEPARATOR, SENTINEL_EMPTY, SENTINEL_MARKER};
use super::types::{FlaggedItem, MarkerPolicy, Strictness};
use super::validation::{cap_items, missing_required_fields};
use super::StructuringError;
use crate::pipeline_config::StructuringConfig;

/// Narrative half of a response plus the validated items of its item block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'t> {
    pub narrative: &'t str,
    pub items: Vec<FlaggedItem>,
    pub diagnostics: Vec<String>,
}

/// Split at the first `SUSPICIOUS ITEMS:` heading.
///
/// Returns the text before the heading and, when the heading is present,
/// the text after it.
pub fn split_at_marker(text: &str) -> (&str, Option<&str>) {
    match text.find(SENTINEL_MARKER) {
        Some(pos) => (&text[..pos], Some(&text[pos + SENTINEL_MARKER.len()..])),
        None => (text, None),
    }
}

/// Separate the narrative from the item block and turn the block into
/// validated items, in source order.
///
/// Fails with `MalformedResponse` when there is no narrative text at all.
/// Other anomalies fail only under the strict policies of `config`.
pub fn extract_items<'t>(
    text: &'t str,
    schema: &CanonicalSchema,
    config: &StructuringConfig,
) -> Result<Extraction<'t>, StructuringError> {
    let (narrative, block) = split_at_marker(text);

    if narrative.trim().is_empty() {
        let reason = if text.trim().is_empty() {
            "response is empty"
        } else {
            "no narrative text before the item block"
        };
        return Err(StructuringError::MalformedResponse(reason.into()));
    }

    let mut diagnostics = Vec::new();

    let items = match block {
        None if schema.has_item_block() && config.marker_policy == MarkerPolicy::Required => {
            return Err(StructuringError::MissingItemBlock);
        }
        None => {
            if schema.has_item_block() {
                tracing::debug!("No item block in response, treating as no flagged items");
            }
            Vec::new()
        }
        Some(_) if !schema.has_item_block() => {
            tracing::debug!("Item block ignored: schema declares no item fields");
            Vec::new()
        }
        Some(block) => {
            let parsed = parse_item_block(block, schema, config.strictness, &mut diagnostics)?;
            cap_items(parsed, config.max_items, &mut diagnostics)
        }
    };

    Ok(Extraction {
        narrative,
        items,
        diagnostics,
    })
}

/// Parse the text after the sentinel heading into items.
fn parse_item_block(
    block: &str,
    schema: &CanonicalSchema,
    strictness: Strictness,
    diagnostics: &mut Vec<String>,
) -> Result<Vec<FlaggedItem>, StructuringError> {
    let block = block.trim();
    if block.is_empty() || block == SENTINEL_EMPTY {
        return Ok(Vec::new());
    }

    let rows: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    // Not "None found." and nothing delimited: truncated or free-form output.
    if !rows.iter().any(|row| row.contains(FIELD_SEPARATOR)) {
        return match strictness {
            Strictness::Strict => Err(StructuringError::UnknownSentinelState),
            Strictness::Lenient => {
                tracing::warn!(
                    lines = rows.len(),
                    "Item block has no delimited rows, treating as no flagged items"
                );
                diagnostics.push(format!(
                    "Item block ignored: {} line(s) without '{FIELD_SEPARATOR}' separators",
                    rows.len()
                ));
                Ok(Vec::new())
            }
        };
    }

    let mut items = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let values: Vec<&str> = row.split(FIELD_SEPARATOR).collect();
        let item = FlaggedItem::from_row(schema.item_fields(), &values);
        let missing = missing_required_fields(&item, schema);
        if missing.is_empty() {
            items.push(item);
            continue;
        }

        let row_number = idx + 1;
        match strictness {
            Strictness::Strict => {
                return Err(StructuringError::MalformedItemRow {
                    row: row_number,
                    missing,
                });
            }
            Strictness::Lenient => {
                // Field names only: row content is client billing data.
                tracing::warn!(
                    row = row_number,
                    missing = %missing.join(", "),
                    "Dropping item row with empty required fields"
                );
                diagnostics.push(format!(
                    "Item row {row_number} dropped: missing {}",
                    missing.join(", ")
                ));
            }
        }
    }

    Ok(items)
}
