pub mod candidate;
pub mod corpus;
pub mod histogram;
pub mod reference;
pub mod warnings;

// re-export for cleaner imports
pub use self::candidate::{Candidate, validate_candidates};
pub use self::corpus::ReferenceCorpus;
pub use self::histogram::{
    LocationSplit, MatchLocation, MismatchHistogram, format_locations, mismatch_column,
    parse_locations,
};
pub use self::reference::{ReferenceHeader, ReferenceSequence, UNKNOWN_GENE};
pub use self::warnings::{DataQualityWarning, PipelineStage};
