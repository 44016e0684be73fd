use std::fmt::{self, Display};

/// The ordered stages of guide selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PipelineStage {
    ScoreFilter,
    MismatchFilter,
    AdaptiveMm0,
    Dedup,
    TopN,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::ScoreFilter => "score filter",
            PipelineStage::MismatchFilter => "mismatch filter",
            PipelineStage::AdaptiveMm0 => "adaptive MM0 tolerance",
            PipelineStage::Dedup => "deduplication",
            PipelineStage::TopN => "top-N selection",
        };
        write!(f, "{}", name)
    }
}

///
/// Non-fatal conditions worth triaging. These travel next to successful
/// results instead of aborting a run.
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DataQualityWarning {
    /// The candidate doesn't occur anywhere in the corpus, not even in the
    /// transcript it was designed from.
    NoSelfMatch { gene: String, sequence: String },
    /// Every candidate of the gene was removed at `stage`.
    GeneWithoutSurvivors { gene: String, stage: PipelineStage },
}

impl Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::NoSelfMatch { gene, sequence } => write!(
                f,
                "{} candidate {} has no perfect match in the reference (MM0=0)",
                gene, sequence
            ),
            DataQualityWarning::GeneWithoutSurvivors { gene, stage } => {
                write!(f, "{} has no candidates left after the {}", gene, stage)
            }
        }
    }
}
