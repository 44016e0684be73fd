use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gsift_core::errors::ConfigurationError;
use gsift_search::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MISMATCHES};
use gsift_select::SelectionConfig;

/// `[search]` table of a gsift config file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub max_mismatches: usize,
    pub chunk_size: usize,
    pub threads: Option<usize>,
    pub extended: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
            extended: false,
        }
    }
}

///
/// A gsift config file. Both tables are optional; command line flags win
/// over anything set here.
///
/// ```toml
/// [search]
/// max_mismatches = 5
/// chunk_size = 1200
///
/// [selection]
/// min_score = 0.5
/// top_n = 10
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GsiftConfig {
    pub search: SearchConfig,
    pub selection: SelectionConfig,
}

impl TryFrom<&Path> for GsiftConfig {
    type Error = ConfigurationError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ConfigurationError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let toml_str = read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config = toml::from_str(&toml_str).map_err(|e| invalid(e.to_string()))?;

        Ok(config)
    }
}

impl GsiftConfig {
    /// Load `path` when given, defaults otherwise.
    pub fn load(path: Option<&String>) -> Result<Self, ConfigurationError> {
        match path {
            Some(path) => GsiftConfig::try_from(Path::new(path)),
            None => Ok(GsiftConfig::default()),
        }
    }
}
