//! # Core models for gsift
//!
//! Shared building blocks for the off-target search engine and the guide
//! selection pipeline:
//!
//! - [models] - reference transcripts, candidates, mismatch histograms and
//!   perfect-match locations
//! - [fasta] - reading a reference transcriptome into memory
//! - [guide_table] - the CSV protocol spoken between the search and selection
//!   steps
//! - [errors] - the error taxonomy used across the workspace
//!
//! ```no_run
//! use gsift_core::models::ReferenceCorpus;
//! use gsift_core::guide_table::GuideTable;
//!
//! let corpus = ReferenceCorpus::try_from("gencode.vM37.transcripts.fa.gz").unwrap();
//! let guides = GuideTable::from_path("guides.csv").unwrap();
//! let candidates = guides.candidates().unwrap();
//! ```
pub mod errors;
pub mod fasta;
pub mod guide_table;
pub mod models;
pub mod utils;

pub use errors::*;
