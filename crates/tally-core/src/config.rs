//! Engine configuration.
//!
//! Parsed from a TOML document the caller has already read; the engine
//! performs no file I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// EngineConfig
///
/// debug    → print `[debug]` lines while a pipeline runs
/// parallel → run pipeline requests on the rayon pool (requires the
///            `parallel` feature; ignored otherwise)
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub debug: bool,
    pub parallel: bool,
}

impl EngineConfig {
    /// Parse a TOML document; absent keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether requests will actually run in parallel in this build.
    #[must_use]
    pub const fn runs_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, EngineConfig::default());
        assert!(!config.runs_parallel());
    }

    #[test]
    fn parses_known_keys() {
        let config =
            EngineConfig::from_toml_str("debug = true\nparallel = true\n").expect("valid config");

        assert!(config.debug);
        assert!(config.parallel);
        assert_eq!(config.runs_parallel(), cfg!(feature = "parallel"));
    }

    #[test]
    fn rejects_unknown_keys_and_wrong_types() {
        for doc in ["verbose = true", "debug = \"yes\""] {
            let err = EngineConfig::from_toml_str(doc).expect_err("invalid config must fail");
            assert!(err.to_string().starts_with("invalid engine config"));
        }
    }
}
