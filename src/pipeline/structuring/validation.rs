// Row-level validation for suspicious items extracted from a review response.
// A row is kept only when every required field is non-empty; the optional
// item cap is applied after validation so it counts surviving rows only.

use super::schema::CanonicalSchema;
use super::types::FlaggedItem;

/// Required fields of `schema` that are empty (or absent) in `item`,
/// in schema order.
pub fn missing_required_fields(item: &FlaggedItem, schema: &CanonicalSchema) -> Vec<String> {
    schema
        .required_fields()
        .iter()
        .filter(|field| item.get(field).map_or(true, |v| v.trim().is_empty()))
        .cloned()
        .collect()
}

/// Keep at most `max_items` items, preserving order. `None` means unbounded.
pub fn cap_items(
    mut items: Vec<FlaggedItem>,
    max_items: Option<usize>,
    diagnostics: &mut Vec<String>,
) -> Vec<FlaggedItem> {
    if let Some(max) = max_items {
        if items.len() > max {
            tracing::warn!(
                item_count = items.len(),
                max_items = max,
                "Flagged items exceed configured cap, truncating"
            );
            diagnostics.push(format!(
                "Excessive flagged items ({}) capped to {max}",
                items.len()
            ));
            items.truncate(max);
        }
    }
    items
}
