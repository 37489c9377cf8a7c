//! Binding failure kinds.
//!
//! Load and link failures surface immediately to the caller of the
//! construction operation; nothing is retried or degraded. Failures inside
//! the native constructor are not observable here and have no variant.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The dynamic library is missing or not loadable on this platform.
    #[error("cannot load library {}: {reason}", path.display())]
    LibraryNotFound { path: PathBuf, reason: String },
    /// The library loaded but does not export `symbol`.
    #[error("undefined symbol {symbol}: {reason}")]
    SymbolNotFound { symbol: String, reason: String },
    /// A value cannot cross the C boundary (interior NUL, separator in a name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The native library reported a failure for an equation call.
    #[error("native call failed: {message}")]
    Native { message: String },
}

impl BindingError {
    /// Stable short name for logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LibraryNotFound { .. } => "library_not_found",
            Self::SymbolNotFound { .. } => "symbol_not_found",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Native { .. } => "native",
        }
    }
}
