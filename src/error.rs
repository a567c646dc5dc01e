//! Crate-level error type.

use thiserror::Error;

use crate::config::loader::ConfigError;

#[derive(Debug, Error)]
pub enum PacerError {
    /// Wrappers host their timers on a tokio runtime.
    #[error("no tokio runtime available to host timers: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
