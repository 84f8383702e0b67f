use uuid::Uuid;

use super::extractor::extract_items;
use super::prompt::{build_review_prompt, build_system_prompt};
use super::sanitize::{normalize_response, strip_line_numbers};
use super::schema::{CanonicalSchema, SchemaVersion};
use super::segmenter::{segment_sections, SectionGrammar};
use super::types::{BillingAnalyzer, CompletionClient, ParseResult, ReviewDocuments};
use super::StructuringError;
use crate::pipeline_config::{ReviewProfile, StructuringConfig};

/// Compiled structuring engine for one schema and one set of policies:
/// normalize → split at sentinel → extract items → segment narrative.
///
/// Immutable after construction, so one instance can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct ResponseStructurer {
    schema: CanonicalSchema,
    grammar: SectionGrammar,
    config: StructuringConfig,
    label: &'static str,
}

impl ResponseStructurer {
    pub fn new(schema: CanonicalSchema, config: StructuringConfig) -> Result<Self, StructuringError> {
        Self::with_label(schema, config, "custom")
    }

    /// Built-in schema with default (lenient) policies.
    pub fn for_version(version: SchemaVersion) -> Result<Self, StructuringError> {
        Self::with_label(version.schema(), StructuringConfig::default(), version.label())
    }

    pub fn from_profile(profile: &ReviewProfile) -> Result<Self, StructuringError> {
        Self::with_label(
            profile.schema.resolve(),
            profile.structuring.clone(),
            profile.schema.label(),
        )
    }

    fn with_label(
        schema: CanonicalSchema,
        config: StructuringConfig,
        label: &'static str,
    ) -> Result<Self, StructuringError> {
        let grammar = SectionGrammar::compile(schema.section_titles())?;
        Ok(Self {
            schema,
            grammar,
            config,
            label,
        })
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// Structure one upstream response. Deterministic and side-effect free
    /// apart from diagnostics logging.
    pub fn structure(&self, raw_text: &str) -> Result<ParseResult, StructuringError> {
        let _span = tracing::info_span!(
            "structure_response",
            schema = self.label,
            strictness = ?self.config.strictness
        )
        .entered();

        let text = normalize_response(raw_text);
        let extraction = extract_items(&text, &self.schema, &self.config)?;

        let narrative = if self.config.strip_line_numbers {
            strip_line_numbers(extraction.narrative)
        } else {
            extraction.narrative.to_string()
        };
        let report = segment_sections(&narrative, &self.grammar);

        tracing::info!(
            sections = report.sections.len(),
            missing_sections = report.missing_titles().len(),
            items = extraction.items.len(),
            diagnostics = extraction.diagnostics.len(),
            "Review response structured"
        );

        Ok(ParseResult {
            report,
            items: extraction.items,
            diagnostics: extraction.diagnostics,
        })
    }
}

/// Structure `raw_text` against `schema` with default (lenient) policies.
pub fn structure(raw_text: &str, schema: &CanonicalSchema) -> Result<ParseResult, StructuringError> {
    ResponseStructurer::new(schema.clone(), StructuringConfig::default())?.structure(raw_text)
}

/// Billing review service: prompt → upstream completion → structuring.
/// Makes exactly one upstream call per review; retries are the caller's
/// decision.
pub struct BillingReviewer {
    client: Box<dyn CompletionClient + Send + Sync>,
    structurer: ResponseStructurer,
    guidance: Option<String>,
}

impl BillingReviewer {
    pub fn new(client: Box<dyn CompletionClient + Send + Sync>, structurer: ResponseStructurer) -> Self {
        Self {
            client,
            structurer,
            guidance: None,
        }
    }

    /// Reference text appended to the system prompt (e.g. the FARB white paper).
    pub fn with_guidance(mut self, guidance: &str) -> Self {
        self.guidance = Some(guidance.to_string());
        self
    }

}

impl BillingAnalyzer for BillingReviewer {
    fn review(
        &self,
        review_id: &Uuid,
        documents: &ReviewDocuments,
    ) -> Result<ParseResult, StructuringError> {
        let _span = tracing::info_span!(
            "billing_review",
            review_id = %review_id,
            invoice_only = documents.is_invoice_only()
        )
        .entered();

        if documents.invoice.trim().is_empty() {
            return Err(StructuringError::MissingInvoice);
        }

        let system = build_system_prompt(self.guidance.as_deref());
        let prompt = build_review_prompt(documents, self.structurer.schema());

        let response = self.client.complete(&system, &prompt).map_err(|e| {
            tracing::warn!(review_id = %review_id, error = %e, "Upstream completion failed");
            e
        })?;

        self.structurer.structure(&response)
    }
}
