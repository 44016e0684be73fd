use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use gsift_core::guide_table::GuideTable;
use gsift_core::models::{DataQualityWarning, PipelineStage};
use gsift_select::{SelectionConfig, SelectionPipeline, StageCounts};

#[fixture]
fn hits() -> GuideTable {
    GuideTable::from_path("../tests/data/hits.csv").unwrap()
}

#[fixture]
fn config() -> SelectionConfig {
    SelectionConfig::try_from(Path::new("../tests/data/selection.toml")).unwrap()
}

#[rstest]
fn test_select_from_files(hits: GuideTable, config: SelectionConfig) {
    let pipeline = SelectionPipeline::new(config).unwrap();
    let (selected, outcome) = pipeline.run_table(&hits).unwrap();

    assert_eq!(
        outcome.counts,
        StageCounts {
            input: 10,
            score_pass: 8,
            mm_filters: 8,
            adaptive_mm0: 7,
            dedup: 7,
            final_count: 4,
        }
    );

    let picked: Vec<(&str, &str, &str)> = (0..selected.len())
        .map(|i| {
            (
                selected.get(i, "Gene").unwrap(),
                selected.get(i, "Target").unwrap(),
                selected.get(i, "Rank").unwrap(),
            )
        })
        .collect();
    assert_eq!(
        picked,
        vec![
            ("Actb", "Actb_t1", "1"),
            ("Actb", "Actb_t2", "2"),
            ("Gapdh", "Gapdh_t1", "1"),
            ("Gapdh", "Gapdh_t1", "2"),
        ]
    );

    assert_eq!(
        outcome.warnings,
        vec![DataQualityWarning::GeneWithoutSurvivors {
            gene: "Sox2".to_string(),
            stage: PipelineStage::ScoreFilter,
        }]
    );
}

#[rstest]
fn test_dedup_without_target_column(hits: GuideTable, config: SelectionConfig) {
    let hits = hits.without_columns(|h| h == "Target");
    let (_, outcome) = SelectionPipeline::new(config).unwrap().run_table(&hits).unwrap();

    assert_eq!(outcome.counts.dedup, 6);
    assert_eq!(outcome.counts.final_count, 4);
}

#[rstest]
fn test_written_selection_reads_back(hits: GuideTable, config: SelectionConfig) {
    let (selected, _) = SelectionPipeline::new(config).unwrap().run_table(&hits).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selected.csv");
    selected.write_to_path(&path).unwrap();

    assert_eq!(GuideTable::from_path(&path).unwrap(), selected);
}
