use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::*;

use gsift::core::guide_table::GuideTable;
use gsift::core::models::ReferenceCorpus;
use gsift::search::{MatchEngine, SearchOptions, results_to_table};
use gsift::select::{SelectionConfig, SelectionPipeline};

#[fixture]
fn path_to_reference() -> &'static str {
    "../tests/data/reference.fa"
}

#[fixture]
fn path_to_guides() -> &'static str {
    "../tests/data/guides.csv"
}

#[rstest]
fn test_search_and_select_in_process(path_to_reference: &str, path_to_guides: &str) {
    let corpus = Arc::new(ReferenceCorpus::try_from(path_to_reference).unwrap());
    let guides = GuideTable::from_path(path_to_guides).unwrap();

    let engine = MatchEngine::new(corpus, SearchOptions::default().with_threads(2)).unwrap();
    let results = engine.search(&guides.candidates().unwrap()).unwrap();
    let hits = results_to_table(&guides, &results, false).unwrap();

    let config = SelectionConfig {
        mm2_ceiling: 1,
        ..Default::default()
    };
    let (selected, outcome) = SelectionPipeline::new(config)
        .unwrap()
        .run_table(&hits)
        .unwrap();

    let genes: Vec<&str> = selected.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(genes, vec!["GeneA", "GeneB", "GeneC"]);
    assert_eq!(outcome.counts.input, 4);
    assert_eq!(outcome.warnings.len(), 2);
}
