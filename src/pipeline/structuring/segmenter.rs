//! Section segmentation.
//!
//! The schema's section titles compile into a [`SectionGrammar`]: one
//! boundary marker per title, each matching the title case-insensitively at
//! the start of a line, optionally preceded by an ordinal such as `1.`, `2)`
//! or `3.)`. A section's body is the span between its own marker and the
//! next marker in schema order.

use regex::{Regex, RegexBuilder};

use super::types::{FormattedReport, Section};
use super::StructuringError;

/// One compiled heading.
#[derive(Debug, Clone)]
struct Boundary {
    title: String,
    pattern: Regex,
}

/// Ordered boundary markers for a schema's section titles.
#[derive(Debug, Clone)]
pub struct SectionGrammar {
    boundaries: Vec<Boundary>,
}

impl SectionGrammar {
    pub fn compile(titles: &[String]) -> Result<Self, StructuringError> {
        let boundaries = titles
            .iter()
            .map(|title| {
                let source = format!(
                    r"^[ \t]*(?:\d+\.?\)?[ \t]*)?{}",
                    regex::escape(title.trim())
                );
                RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .multi_line(true)
                    .build()
                    .map(|pattern| Boundary {
                        title: title.clone(),
                        pattern,
                    })
                    .map_err(|e| {
                        StructuringError::InvalidSchema(format!(
                            "section title '{title}' cannot be matched: {e}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { boundaries })
    }

    /// Body of the section at `idx`.
    ///
    /// The body ends where the next title in schema order starts. `None` when
    /// the heading never occurs, or when it is not the last title and the
    /// next title does not follow it.
    fn span<'t>(&self, text: &'t str, idx: usize) -> Option<&'t str> {
        let head = self.boundaries[idx].pattern.find(text)?;
        let body_start = head.end();
        let body_end = match self.boundaries.get(idx + 1) {
            Some(next) => next.pattern.find_at(text, body_start)?.start(),
            None => text.len(),
        };
        Some(&text[body_start..body_end])
    }
}

/// Map narrative text onto the grammar's sections, in grammar order.
///
/// Never fails: a heading that cannot be found yields placeholder content.
pub fn segment_sections(narrative: &str, grammar: &SectionGrammar) -> FormattedReport {
    let sections = grammar
        .boundaries
        .iter()
        .enumerate()
        .map(|(idx, boundary)| match grammar.span(narrative, idx) {
            Some(body) => Section {
                title: boundary.title.clone(),
                content: body.trim().to_string(),
            },
            None => {
                tracing::debug!(section = %boundary.title, "Section heading or its end boundary not found");
                Section::placeholder(&boundary.title)
            }
        })
        .collect();

    FormattedReport { sections }
}
