//! Harness failures.

use simplemath_binding::BindingError;
use simplemath_core::MathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Short name recorded as `error_kind` in the run log.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Math(_) => "math",
            Self::Binding(err) => err.kind(),
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
