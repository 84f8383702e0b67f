pub mod types;
pub mod schema;
pub mod sanitize;
pub mod segmenter;
pub mod extractor;
pub mod validation;
pub mod confidence;
pub mod report;
pub mod prompt;
pub mod client;
pub mod orchestrator;

pub use types::*;
pub use schema::*;
pub use sanitize::*;
pub use segmenter::*;
pub use extractor::*;
pub use validation::*;
pub use confidence::*;
pub use report::*;
pub use prompt::*;
pub use client::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Upstream completion service failed: {0}")]
    Upstream(String),

    #[error("Malformed review response: {0}")]
    MalformedResponse(String),

    #[error("Review response has no 'SUSPICIOUS ITEMS:' item block")]
    MissingItemBlock,

    #[error("Malformed item row {row}: missing required field(s) {}", .missing.join(", "))]
    MalformedItemRow { row: usize, missing: Vec<String> },

    #[error("Item block is neither 'None found.' nor a set of delimited rows")]
    UnknownSentinelState,

    #[error("Invalid canonical schema: {0}")]
    InvalidSchema(String),

    #[error("Invoice text is required for a billing review")]
    MissingInvoice,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
