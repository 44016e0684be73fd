//! # Guide selection
//!
//! Narrows off-target search results down to a ranked shortlist per gene and
//! classifies where perfect matches land.
//!
//! ```no_run
//! use gsift_core::guide_table::GuideTable;
//! use gsift_select::{SelectionConfig, SelectionPipeline};
//!
//! let table = GuideTable::from_path("hits.csv").unwrap();
//! let pipeline = SelectionPipeline::new(SelectionConfig::default()).unwrap();
//! let (selected, outcome) = pipeline.run_table(&table).unwrap();
//!
//! outcome.log();
//! selected.write_to_path("selected.csv").unwrap();
//! ```
pub mod categorize;
pub mod config;
pub mod pipeline;
pub mod stages;

pub use categorize::{
    Category, CategoryReport, CategorySummary, ConcerningGuide, categorize, categorize_table,
};
pub use config::SelectionConfig;
pub use pipeline::{RankedCandidate, SelectionOutcome, SelectionPipeline, StageCounts};
