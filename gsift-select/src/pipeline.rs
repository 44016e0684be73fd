use std::collections::BTreeSet;

use log::{info, warn};
use serde::Serialize;

use gsift_core::errors::{ConfigurationError, GuideTableError};
use gsift_core::guide_table::{
    GuideRecord, GuideTable, RANK_COLUMN, SCORE_COLUMN, TARGET_COLUMN,
};
use gsift_core::models::{DataQualityWarning, PipelineStage};

use crate::config::SelectionConfig;
use crate::stages::{
    deduplicate, mismatch_filter, mm0_tolerance_filter, score_filter, top_n_per_gene,
};

/// A surviving row and its 1-based rank within its gene.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub record: GuideRecord,
    pub rank: usize,
}

/// Rows left after each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub input: usize,
    pub score_pass: usize,
    pub mm_filters: usize,
    pub adaptive_mm0: usize,
    pub dedup: usize,
    #[serde(rename = "final")]
    pub final_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Ordered by gene name, then rank.
    pub ranked: Vec<RankedCandidate>,
    pub counts: StageCounts,
    pub warnings: Vec<DataQualityWarning>,
}

/// The part of a [SelectionOutcome] written to `--summary`.
#[derive(Debug, Serialize)]
pub struct SelectionSummary<'a> {
    pub config: &'a SelectionConfig,
    pub counts: &'a StageCounts,
    pub warnings: &'a [DataQualityWarning],
}

///
/// Runs the five selection stages in their fixed order: score filter,
/// mismatch filter, adaptive MM0 tolerance, deduplication and top-N per gene.
///
#[derive(Debug, Clone)]
pub struct SelectionPipeline {
    config: SelectionConfig,
}

/// Tracks which genes still have rows so their disappearance can be reported.
struct GeneTracker {
    alive: BTreeSet<String>,
    warnings: Vec<DataQualityWarning>,
}

impl GeneTracker {
    fn new(records: &[GuideRecord]) -> Self {
        GeneTracker {
            alive: genes(records),
            warnings: Vec::new(),
        }
    }

    fn after(&mut self, stage: PipelineStage, records: &[GuideRecord]) {
        let remaining = genes(records);
        for gene in self.alive.difference(&remaining) {
            self.warnings.push(DataQualityWarning::GeneWithoutSurvivors {
                gene: gene.clone(),
                stage,
            });
        }
        self.alive = remaining;
    }
}

fn genes(records: &[GuideRecord]) -> BTreeSet<String> {
    records
        .iter()
        .map(|r| r.candidate.gene_symbol.clone())
        .collect()
}

impl SelectionPipeline {
    pub fn new(config: SelectionConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(SelectionPipeline { config })
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    ///
    /// Select from parsed records.
    ///
    /// # Arguments
    /// - records: rows of a search output table
    /// - dedup_by_target: include the target id in the dedup key
    ///
    pub fn run(&self, records: Vec<GuideRecord>, dedup_by_target: bool) -> SelectionOutcome {
        let config = &self.config;
        let mut counts = StageCounts {
            input: records.len(),
            ..Default::default()
        };

        let mut warnings: Vec<DataQualityWarning> = records
            .iter()
            .filter(|r| r.histogram.mm0() == 0)
            .map(|r| DataQualityWarning::NoSelfMatch {
                gene: r.candidate.gene_symbol.clone(),
                sequence: r.candidate.sequence.clone(),
            })
            .collect();
        let mut tracker = GeneTracker::new(&records);

        let records = score_filter(records, config.min_score);
        counts.score_pass = records.len();
        tracker.after(PipelineStage::ScoreFilter, &records);

        let records = mismatch_filter(records, config.mm1_ceiling, config.mm2_ceiling);
        counts.mm_filters = records.len();
        tracker.after(PipelineStage::MismatchFilter, &records);

        let records = if config.adaptive_mm0_enabled() {
            mm0_tolerance_filter(records, config.mm0_tolerance)
        } else {
            records
        };
        counts.adaptive_mm0 = records.len();
        tracker.after(PipelineStage::AdaptiveMm0, &records);

        let records = deduplicate(records, dedup_by_target);
        counts.dedup = records.len();
        tracker.after(PipelineStage::Dedup, &records);

        let ranked: Vec<RankedCandidate> = top_n_per_gene(records, config.top_n)
            .into_iter()
            .flat_map(|(_, members)| {
                members
                    .into_iter()
                    .enumerate()
                    .map(|(i, record)| RankedCandidate { record, rank: i + 1 })
            })
            .collect();
        counts.final_count = ranked.len();

        warnings.extend(tracker.warnings);

        SelectionOutcome {
            ranked,
            counts,
            warnings,
        }
    }

    ///
    /// Select rows of a search output table. The returned table keeps every
    /// input column and appends `Rank`.
    ///
    pub fn run_table(
        &self,
        table: &GuideTable,
    ) -> Result<(GuideTable, SelectionOutcome), GuideTableError> {
        table.require_column(SCORE_COLUMN)?;
        let records = table.guide_records()?;
        let outcome = self.run(records, table.column(TARGET_COLUMN).is_some());

        let source = table.without_columns(|h| h.trim().eq_ignore_ascii_case(RANK_COLUMN));
        let mut headers = source.headers.clone();
        headers.push(RANK_COLUMN.to_string());

        let mut selected = GuideTable::new(headers);
        for ranked in &outcome.ranked {
            let mut row = source.rows[ranked.record.row].clone();
            row.push(ranked.rank.to_string());
            selected.push_row(row)?;
        }

        Ok((selected, outcome))
    }
}

impl SelectionOutcome {
    pub fn summary<'a>(&'a self, config: &'a SelectionConfig) -> SelectionSummary<'a> {
        SelectionSummary {
            config,
            counts: &self.counts,
            warnings: &self.warnings,
        }
    }

    /// Log the stage counts at info and every warning at warn level.
    pub fn log(&self) {
        let c = &self.counts;
        info!("Input guides: {}", c.input);
        info!("After score filter: {}", c.score_pass);
        info!("After MM1/MM2 filters: {}", c.mm_filters);
        info!("After adaptive MM0: {}", c.adaptive_mm0);
        info!("After deduplication: {}", c.dedup);
        info!("Selected guides: {}", c.final_count);

        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}
