use std::num::NonZeroUsize;
use std::thread;

use gsift_core::errors::ConfigurationError;

use crate::consts::{DEFAULT_MAX_MISMATCHES, MAX_SUPPORTED_MISMATCHES};

///
/// Knobs of a search run. Everything the engine needs is passed in here;
/// nothing is read from the environment.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Largest Hamming distance that is counted (K).
    pub max_mismatches: usize,
    /// Worker threads; `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            threads: None,
            show_progress: false,
        }
    }
}

impl SearchOptions {
    pub fn with_max_mismatches(mut self, max_mismatches: usize) -> Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_mismatches == 0 || self.max_mismatches > MAX_SUPPORTED_MISMATCHES {
            return Err(ConfigurationError::InvalidMaxMismatches {
                found: self.max_mismatches,
                max: MAX_SUPPORTED_MISMATCHES,
            });
        }
        if self.threads == Some(0) {
            return Err(ConfigurationError::InvalidThreadCount);
        }
        Ok(())
    }

    /// Thread count the worker pool will be built with.
    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }
}
