//! # Off-target mismatch search
//!
//! Counts, for each guide sequence, how many windows of a reference
//! transcriptome lie at Hamming distance `0..=K` from it, and where the
//! perfect matches are.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gsift_core::models::{Candidate, ReferenceCorpus};
//! use gsift_search::{MatchEngine, SearchOptions};
//!
//! let corpus = Arc::new(ReferenceCorpus::try_from("transcripts.fa.gz").unwrap());
//! let engine = MatchEngine::new(corpus, SearchOptions::default().with_threads(4)).unwrap();
//!
//! let results = engine
//!     .search(&[Candidate::new("Actb", "GCTCGTCGTCGACAACGGCT")])
//!     .unwrap();
//! println!("{}", results.hits[0].histogram);
//! ```
pub mod cancel;
pub mod consts;
pub mod engine;
pub mod hamming;
pub mod options;
pub mod process;
pub mod report;

pub use cancel::CancellationToken;
pub use engine::{CandidateHits, MatchEngine, ScanStatus, SearchResults, search};
pub use options::SearchOptions;
pub use process::ProcessSearcher;
pub use report::results_to_table;
