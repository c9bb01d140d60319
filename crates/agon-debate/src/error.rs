//! Session error types

use agon_core::ConfigError;
use thiserror::Error;

/// Errors returned synchronously by [`crate::SessionController`]
///
/// Provider failures during a turn are not represented here: they are
/// recorded in the transcript and in `last_error` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("A debate is already running")]
    Busy,
}

impl SessionError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, SessionError::Configuration(_))
    }
}
