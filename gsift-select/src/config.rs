use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gsift_core::errors::ConfigurationError;

/// `mm0_tolerance` value that turns the adaptive MM0 stage off.
pub const MM0_TOLERANCE_DISABLED: u64 = 999;

pub const DEFAULT_MIN_SCORE: f64 = 0.0;
pub const DEFAULT_TOP_N: usize = 10;

///
/// Thresholds of the selection stages. Every field has a default, so a config
/// file only needs to name what it changes.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Rows scoring below this (or without a score) are dropped.
    #[serde(alias = "min_guide_score")]
    pub min_score: f64,
    /// Highest accepted MM1 count.
    #[serde(alias = "mm1_threshold")]
    pub mm1_ceiling: u64,
    /// Highest accepted MM2 count.
    #[serde(alias = "mm2_threshold")]
    pub mm2_ceiling: u64,
    pub adaptive_mm0: bool,
    /// Accepted MM0 range above each gene's minimum.
    pub mm0_tolerance: u64,
    /// Candidates kept per gene.
    #[serde(alias = "top_n_guides")]
    pub top_n: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            min_score: DEFAULT_MIN_SCORE,
            mm1_ceiling: 0,
            mm2_ceiling: 0,
            adaptive_mm0: true,
            mm0_tolerance: 0,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.min_score.is_finite() {
            return Err(ConfigurationError::InvalidThreshold(format!(
                "min_score must be a finite number, got {}",
                self.min_score
            )));
        }
        if self.top_n == 0 {
            return Err(ConfigurationError::InvalidThreshold(
                "top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `false` when the adaptive MM0 stage is switched off or disabled through
    /// the tolerance sentinel.
    pub fn adaptive_mm0_enabled(&self) -> bool {
        self.adaptive_mm0 && self.mm0_tolerance != MM0_TOLERANCE_DISABLED
    }
}

impl TryFrom<&Path> for SelectionConfig {
    type Error = ConfigurationError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ConfigurationError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        };

        let toml_str = read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config: SelectionConfig =
            toml::from_str(&toml_str).map_err(|e| invalid(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_defaults() {
        let config = SelectionConfig::default();
        assert_eq!(config.top_n, 10);
        assert!(config.adaptive_mm0_enabled());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let config: SelectionConfig = toml::from_str("min_score = 0.5\ntop_n = 3\n").unwrap();
        assert_eq!(config.min_score, 0.5);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.mm1_ceiling, 0);
        assert!(config.adaptive_mm0);
    }

    #[rstest]
    fn test_legacy_key_names() {
        let config: SelectionConfig = toml::from_str(
            "min_guide_score = 0.2\nmm1_threshold = 1\nmm2_threshold = 4\ntop_n_guides = 5\n",
        )
        .unwrap();
        assert_eq!(config.min_score, 0.2);
        assert_eq!(config.mm1_ceiling, 1);
        assert_eq!(config.mm2_ceiling, 4);
        assert_eq!(config.top_n, 5);
    }

    #[rstest]
    #[case(MM0_TOLERANCE_DISABLED, true, false)]
    #[case(3, false, false)]
    #[case(3, true, true)]
    fn test_adaptive_mm0_enabled(
        #[case] tolerance: u64,
        #[case] adaptive: bool,
        #[case] expected: bool,
    ) {
        let config = SelectionConfig {
            mm0_tolerance: tolerance,
            adaptive_mm0: adaptive,
            ..Default::default()
        };
        assert_eq!(config.adaptive_mm0_enabled(), expected);
    }

    #[rstest]
    fn test_invalid_values() {
        let zero = SelectionConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigurationError::InvalidThreshold(_))));

        assert!(toml::from_str::<SelectionConfig>("top_n = -1\n").is_err());
        assert!(toml::from_str::<SelectionConfig>("bogus = 1\n").is_err());
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = Path::new("../tests/data/selection.toml");
        let config = SelectionConfig::try_from(path).unwrap();
        assert_eq!(config.mm1_ceiling, 1);
        assert_eq!(config.top_n, 2);

        let err = SelectionConfig::try_from(Path::new("../tests/data/missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigurationError::ConfigFile { .. }));
    }
}
