//! Rendering of search results in the tabular guide format.

use gsift_core::errors::{ConfigurationError, GuideTableError};
use gsift_core::guide_table::{
    GENE_COLUMN, GuideTable, LOCATIONS_COLUMN, SEQUENCE_COLUMN, is_mismatch_column,
};
use gsift_core::models::{LocationSplit, format_locations, mismatch_column};

use crate::consts::{
    OTHER_GENE_OCCURRENCES_COLUMN, OTHER_GENE_TRANSCRIPTS_COLUMN, SAME_GENE_OCCURRENCES_COLUMN,
    SAME_GENE_TRANSCRIPTS_COLUMN,
};
use crate::engine::{CandidateHits, SearchResults};

/// Columns added by `--extended`, in output order.
pub const EXTENDED_COLUMNS: [&str; 5] = [
    LOCATIONS_COLUMN,
    SAME_GENE_TRANSCRIPTS_COLUMN,
    SAME_GENE_OCCURRENCES_COLUMN,
    OTHER_GENE_TRANSCRIPTS_COLUMN,
    OTHER_GENE_OCCURRENCES_COLUMN,
];

/// `true` for columns the search step writes itself.
pub fn is_search_column(header: &str) -> bool {
    is_mismatch_column(header)
        || EXTENDED_COLUMNS
            .iter()
            .any(|c| c.eq_ignore_ascii_case(header.trim()))
}

///
/// Build the output table of a search.
///
/// Rows follow the candidate order of `input`. Every input column other than
/// `Gene` and `Sequence` is carried over, except for histogram and location
/// columns left by an earlier run, which are replaced.
///
/// # Arguments
/// - input: the table the candidates were read from
/// - results: the complete results of searching those candidates
/// - extended: append the location columns
///
pub fn results_to_table(
    input: &GuideTable,
    results: &SearchResults,
    extended: bool,
) -> Result<GuideTable, GuideTableError> {
    let gene_col = input.require_column(GENE_COLUMN)?;
    let seq_col = input.require_column(SEQUENCE_COLUMN)?;

    let passthrough: Vec<usize> = (0..input.headers.len())
        .filter(|&i| i != gene_col && i != seq_col && !is_search_column(&input.headers[i]))
        .collect();

    let mut headers = vec![GENE_COLUMN.to_string(), SEQUENCE_COLUMN.to_string()];
    headers.extend(passthrough.iter().map(|&i| input.headers[i].clone()));
    headers.extend((0..=results.max_mismatches).map(mismatch_column));
    if extended {
        headers.extend(EXTENDED_COLUMNS.iter().map(|c| c.to_string()));
    }

    let mut table = GuideTable::new(headers);

    for hit in &results.hits {
        let source = input.rows.get(hit.index).ok_or_else(|| {
            ConfigurationError::InvalidField {
                column: SEQUENCE_COLUMN.to_string(),
                row: hit.index + 1,
                value: hit.candidate.sequence.clone(),
            }
        })?;

        let mut row = vec![source[gene_col].clone(), hit.candidate.sequence.clone()];
        row.extend(passthrough.iter().map(|&i| source[i].clone()));
        row.extend(hit.histogram.counts().iter().map(u64::to_string));
        if extended {
            row.extend(extended_fields(hit));
        }

        table.push_row(row)?;
    }

    Ok(table)
}

fn extended_fields(hit: &CandidateHits) -> [String; 5] {
    let split = LocationSplit::new(&hit.candidate.gene_symbol, &hit.locations);
    [
        format_locations(&hit.locations),
        split.same_gene_labels.join(", "),
        split.same_gene_occurrences.to_string(),
        split.other_gene_labels.join(", "),
        split.other_gene_occurrences.to_string(),
    ]
}
