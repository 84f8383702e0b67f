pub mod config;
pub mod pipeline;
pub mod pipeline_config;

pub use pipeline::structuring::{
    structure, AnalysisResponse, BillingAnalyzer, BillingReviewer, CanonicalSchema,
    CompletionClient, FlaggedItem, FormattedReport, ParseResult, ResponseStructurer,
    ReviewDocuments, SchemaVersion, StructuringError,
};
pub use pipeline_config::{ReviewProfile, StructuringConfig};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. A no-op if a subscriber is already installed.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
