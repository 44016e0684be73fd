use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::*;

use gsift_core::guide_table::GuideTable;
use gsift_core::models::ReferenceCorpus;
use gsift_search::{CancellationToken, MatchEngine, SearchOptions, results_to_table};

#[fixture]
fn path_to_reference() -> &'static str {
    "../tests/data/reference.fa"
}

#[fixture]
fn path_to_guides() -> &'static str {
    "../tests/data/guides.csv"
}

#[rstest]
fn test_search_fixture_files(path_to_reference: &str, path_to_guides: &str) {
    let corpus = Arc::new(ReferenceCorpus::try_from(path_to_reference).unwrap());
    let guides = GuideTable::from_path(path_to_guides).unwrap();
    let candidates = guides.candidates().unwrap();

    let engine = MatchEngine::new(corpus, SearchOptions::default().with_threads(2)).unwrap();
    let results = engine
        .search_chunked(&candidates, 3, &CancellationToken::new())
        .unwrap();
    let table = results_to_table(&guides, &results, true).unwrap();

    let mm: Vec<Vec<&str>> = (0..table.len())
        .map(|row| {
            (0..=5)
                .filter_map(|d| table.get(row, &format!("MM{d}")))
                .collect()
        })
        .collect();

    assert_eq!(
        mm,
        vec![
            vec!["1", "0", "1", "0", "0", "0"],
            vec!["1", "0", "1", "0", "0", "0"],
            vec!["1", "0", "0", "0", "0", "0"],
            vec!["0", "2", "0", "0", "0", "0"],
        ]
    );
    assert_eq!(table.get(0, "MM0_Locations"), Some("tx1|GeneA|GeneA-201|1"));
    assert_eq!(table.get(3, "MM0_Locations"), Some(""));
    assert_eq!(results.warnings().len(), 1);
}

#[rstest]
fn test_gzipped_reference_with_gencode_headers() {
    let corpus = ReferenceCorpus::try_from("../tests/data/gencode_like.fa.gz").unwrap();
    let guides = GuideTable::from_path("../tests/data/gencode_guides.csv").unwrap();

    let engine = MatchEngine::new(corpus, SearchOptions::default().with_max_mismatches(3)).unwrap();
    let results = engine.search(&guides.candidates().unwrap()).unwrap();
    let table = results_to_table(&guides, &results, true).unwrap();

    assert_eq!(table.get(0, "MM0_Same_Gene_Transcripts"), Some("Actb-201, Actb-202"));
    assert_eq!(table.get(0, "MM0_Other_Gene_Transcripts"), Some("Actg1-201"));
    assert_eq!(table.get(1, "MM0_Same_Gene_Transcripts"), Some("Gapdh-201"));
    assert_eq!(table.get(1, "MM0_Other_Gene_Occurrences"), Some("0"));
}
