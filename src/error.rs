use thiserror::Error;

use crate::config::ConfigError;
use crate::core::CoreError;
use crate::engine::EngineError;
use crate::store::StoreError;

/// Crate-level convenience error.
///
/// Not a "god error": it is a thin wrapper over canonical capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether retrying this operation may succeed without changing inputs.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Core(_) | Error::Config(_) => false,
            Error::Store(e) => e.is_retryable(),
            Error::Engine(e) => e.is_retryable(),
        }
    }
}
