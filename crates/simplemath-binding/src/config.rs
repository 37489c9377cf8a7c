//! Binding configuration.
//!
//! Read from the environment:
//! - `SIMPLEMATH_LIBRARY`: path of the native library
//!   (default `./libSimpleMath.so`, resolved against the working directory).
//! - `SIMPLEMATH_LOG`: path of a structured JSONL log. Unset or empty
//!   disables logging.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const LIBRARY_ENV: &str = "SIMPLEMATH_LIBRARY";
pub const LOG_ENV: &str = "SIMPLEMATH_LOG";
pub const DEFAULT_LIBRARY_PATH: &str = "./libSimpleMath.so";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConfig {
    library_path: PathBuf,
    log_path: Option<PathBuf>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from(DEFAULT_LIBRARY_PATH),
            log_path: None,
        }
    }
}

impl BindingConfig {
    /// Configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Configuration from an arbitrary variable source. Empty values count
    /// as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let mut config = Self::default();
        if let Some(path) = non_empty(LIBRARY_ENV) {
            config.library_path = path;
        }
        config.log_path = non_empty(LOG_ENV);
        config
    }

    #[must_use]
    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = path.into();
        self
    }

    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BindingConfig::from_lookup(|_| None);
        assert_eq!(config, BindingConfig::default());
        assert_eq!(config.library_path(), Path::new("./libSimpleMath.so"));
        assert_eq!(config.log_path(), None);
    }

    #[test]
    fn env_overrides() {
        let config = BindingConfig::from_lookup(|key| match key {
            LIBRARY_ENV => Some("/opt/smath/libSimpleMath.so".into()),
            LOG_ENV => Some("/tmp/smath.jsonl".into()),
            _ => None,
        });
        assert_eq!(
            config.library_path(),
            Path::new("/opt/smath/libSimpleMath.so")
        );
        assert_eq!(config.log_path(), Some(Path::new("/tmp/smath.jsonl")));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = BindingConfig::from_lookup(|_| Some(OsString::new()));
        assert_eq!(config, BindingConfig::default());
    }

    #[test]
    fn builders() {
        let config = BindingConfig::default()
            .with_library_path("libother.so")
            .with_log_path("run.jsonl");
        assert_eq!(config.library_path(), Path::new("libother.so"));
        assert_eq!(config.log_path(), Some(Path::new("run.jsonl")));
    }
}
