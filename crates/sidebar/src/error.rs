//! CLI error types.

use sidebar_config::ConfigError;
use sidebar_markup::MarkupError;
use sidebar_store::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Markup(#[from] MarkupError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),
}
