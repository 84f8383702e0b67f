use std::fmt::Write;

use super::sanitize::remove_invisible_chars;
use super::schema::{CanonicalSchema, SENTINEL_EMPTY, SENTINEL_MARKER};
use super::types::ReviewDocuments;

/// Suggested number of suspicious items per review. Advisory only: the
/// extractor never pads or truncates to this range.
pub const SUGGESTED_ITEM_RANGE: (usize, usize) = (15, 20);

pub const REVIEW_SYSTEM_PROMPT: &str = r#"
You are an assistant specialized in legal billing analysis using the FARB
(Fair, Accurate, Reflective, Billing) framework. Your task is to analyze the
provided invoice, considering the terms set in the engagement letter and any
amendment.

RULES:
1. Base every finding on the documents provided. Quote amounts verbatim.
2. Focus on fairness of charges, accuracy of billing details, how well the
   descriptions reflect the work done, and overall billing integrity.
3. Highlight discrepancies and give recommendations for the client.
4. Use the section headings you are given, exactly as written, in order.
5. Be thorough but concise.
"#;

/// Build the system prompt, optionally followed by reference guidance
/// (e.g. the FARB white paper).
pub fn build_system_prompt(guidance: Option<&str>) -> String {
    match guidance.map(str::trim).filter(|g| !g.is_empty()) {
        Some(guidance) => format!(
            "{}\nApply the FARB principles as described in this reference:\n\n{}\n",
            REVIEW_SYSTEM_PROMPT.trim_end(),
            remove_invisible_chars(guidance)
        ),
        None => REVIEW_SYSTEM_PROMPT.to_string(),
    }
}

/// Build the user prompt for one review in the response format of `schema`.
pub fn build_review_prompt(documents: &ReviewDocuments, schema: &CanonicalSchema) -> String {
    let mut prompt = String::from("Analyze these documents based on FARB principles:\n\n");

    if documents.is_invoice_only() {
        prompt.push_str(
            "Engagement Letter:\nNot provided. Assess the invoice on its own terms \
             and note where an engagement letter would be needed to confirm rates.\n\n",
        );
    } else {
        let _ = write!(
            prompt,
            "Engagement Letter:\n{}\n\n",
            remove_invisible_chars(documents.letter.trim())
        );
    }

    let _ = write!(
        prompt,
        "Invoice:\n{}\n\n",
        remove_invisible_chars(documents.invoice.trim())
    );

    if let Some(amendment) = documents
        .amendment
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        let _ = write!(prompt, "Amendment:\n{}\n\n", remove_invisible_chars(amendment));
    }

    prompt.push_str("Write your analysis under these headings, each on its own line, in this order:\n");
    for (idx, title) in schema.section_titles().iter().enumerate() {
        let _ = writeln!(prompt, "{}. {title}", idx + 1);
    }

    if schema.has_item_block() {
        let (low, high) = SUGGESTED_ITEM_RANGE;
        let _ = write!(
            prompt,
            "\nAfter the last section, write the line \"{SENTINEL_MARKER}\" followed by one \
             line per suspicious invoice item, with fields separated by \" | \" in this order:\n\
             {}\n\
             List {low}-{high} items where the invoice supports it. Do not add a header row. \
             If no items are suspicious, write \"{SENTINEL_EMPTY}\" on the line after \
             \"{SENTINEL_MARKER}\".\n",
            schema.item_fields().join(" | ")
        );
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::schema::SchemaVersion;

    fn documents() -> ReviewDocuments {
        ReviewDocuments {
            letter: "Partner rate $400/hr".into(),
            invoice: "Research 10h $5,000".into(),
            amendment: None,
        }
    }

    #[test]
    fn prompt_contains_document_text() {
        let prompt = build_review_prompt(&documents(), &SchemaVersion::V2.schema());
        assert!(prompt.contains("Engagement Letter:\nPartner rate $400/hr"));
        assert!(prompt.contains("Invoice:\nResearch 10h $5,000"));
        assert!(!prompt.contains("Amendment:"));
    }

    #[test]
    fn amendment_included_when_present() {
        let mut docs = documents();
        docs.amendment = Some("Rate raised to $450/hr".into());
        let prompt = build_review_prompt(&docs, &SchemaVersion::V2.schema());
        assert!(prompt.contains("Amendment:\nRate raised to $450/hr"));
    }

    #[test]
    fn invoice_only_mode_notes_missing_letter() {
        let mut docs = documents();
        docs.letter = String::new();
        let prompt = build_review_prompt(&docs, &SchemaVersion::V4.schema());
        assert!(prompt.contains("Engagement Letter:\nNot provided."));
    }

    #[test]
    fn lists_headings_in_schema_order() {
        let schema = SchemaVersion::V3.schema();
        let prompt = build_review_prompt(&documents(), &schema);
        assert!(prompt.contains("1. EXECUTIVE SUMMARY:\n"));
        assert!(prompt.contains("12. CONCLUSION:\n"));
        let first = prompt.find("EXECUTIVE SUMMARY:").unwrap();
        let last = prompt.find("CONCLUSION:").unwrap();
        assert!(first < last);
    }

    #[test]
    fn describes_item_block_for_item_schemas() {
        let prompt = build_review_prompt(&documents(), &SchemaVersion::V4.schema());
        assert!(prompt.contains("SUSPICIOUS ITEMS:"));
        assert!(prompt.contains(
            "itemNumber | description | name | rate | quantity | totalCost | reason | confidence"
        ));
        assert!(prompt.contains("None found."));
        assert!(prompt.contains("15-20 items"));
    }

    #[test]
    fn narrative_only_schema_has_no_item_instructions() {
        let prompt = build_review_prompt(&documents(), &SchemaVersion::V1.schema());
        assert!(!prompt.contains("SUSPICIOUS ITEMS:"));
        assert!(prompt.contains("4. BILLING INTEGRITY:"));
    }

    #[test]
    fn system_prompt_appends_guidance() {
        let prompt = build_system_prompt(Some("Rates must match the letter."));
        assert!(prompt.contains("FARB"));
        assert!(prompt.contains("Rates must match the letter."));
        assert_eq!(build_system_prompt(Some("   ")), REVIEW_SYSTEM_PROMPT);
        assert_eq!(build_system_prompt(None), REVIEW_SYSTEM_PROMPT);
    }
}
