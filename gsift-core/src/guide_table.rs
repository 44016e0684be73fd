use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{ConfigurationError, GuideTableError};
use crate::models::{Candidate, MismatchHistogram, mismatch_column};
use crate::utils::{get_dynamic_reader_w_stdin, write_atomically};

pub const GENE_COLUMN: &str = "Gene";
pub const SEQUENCE_COLUMN: &str = "Sequence";
pub const SCORE_COLUMN: &str = "Score";
pub const TARGET_COLUMN: &str = "Target";
pub const RANK_COLUMN: &str = "Rank";
pub const LOCATIONS_COLUMN: &str = "MM0_Locations";

/// Mismatch buckets the selection stages read.
pub const REQUIRED_MISMATCH_BUCKETS: usize = 3;

///
/// One parsed row of a guide table: the candidate, its histogram and the
/// index of the row it came from.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GuideRecord {
    pub candidate: Candidate,
    pub histogram: MismatchHistogram,
    pub row: usize,
}

///
/// A CSV table of guides with a header row. Columns are kept as text so that
/// anything the caller added (scores, target ids, annotations) is carried
/// through untouched; typed views are parsed on demand.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl GuideTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GuideTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    ///
    /// Read a table from disk. `-` reads stdin, `.gz` files are decompressed.
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GuideTableError> {
        let path = path.as_ref();
        let unreadable = |source: csv::Error| GuideTableError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let reader = get_dynamic_reader_w_stdin(&path.to_string_lossy())
            .map_err(|e| unreadable(csv::Error::from(e)))?;

        match Self::from_reader(reader) {
            Err(GuideTableError::Csv(source)) => Err(unreadable(source)),
            other => other,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), GuideTableError> {
        if row.len() != self.headers.len() {
            return Err(GuideTableError::RaggedRow {
                row: self.rows.len() + 1,
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    pub fn require_column(&self, name: &str) -> Result<usize, ConfigurationError> {
        self.column(name)
            .ok_or_else(|| ConfigurationError::MissingColumn(name.to_string()))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Indices of the contiguous `MM0, MM1, ...` columns.
    pub fn histogram_columns(&self) -> Vec<usize> {
        (0..)
            .map(|d| self.column(&mismatch_column(d)))
            .take_while(Option::is_some)
            .flatten()
            .collect()
    }

    ///
    /// Parse the `Gene` and `Sequence` columns (plus `Score` and `Target` when
    /// present) into candidates, in row order.
    ///
    pub fn candidates(&self) -> Result<Vec<Candidate>, ConfigurationError> {
        let gene_col = self.require_column(GENE_COLUMN)?;
        let seq_col = self.require_column(SEQUENCE_COLUMN)?;
        let score_col = self.column(SCORE_COLUMN);
        let target_col = self.column(TARGET_COLUMN);

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut candidate = Candidate::new(row[gene_col].clone(), &row[seq_col]);
                if let Some(col) = score_col {
                    candidate.relevance_score = parse_score(&row[col], i)?;
                }
                if let Some(col) = target_col {
                    if !row[col].is_empty() {
                        candidate.target = Some(row[col].clone());
                    }
                }
                Ok(candidate)
            })
            .collect()
    }

    ///
    /// Parse every row into a [GuideRecord]. Needs at least the `MM0`, `MM1`
    /// and `MM2` columns on top of what [GuideTable::candidates] needs.
    ///
    pub fn guide_records(&self) -> Result<Vec<GuideRecord>, ConfigurationError> {
        let mm_cols = self.histogram_columns();
        if mm_cols.len() < REQUIRED_MISMATCH_BUCKETS {
            return Err(ConfigurationError::MissingColumn(mismatch_column(
                mm_cols.len(),
            )));
        }

        let candidates = self.candidates()?;

        candidates
            .into_iter()
            .zip(self.rows.iter())
            .enumerate()
            .map(|(i, (candidate, row))| {
                let counts = mm_cols
                    .iter()
                    .enumerate()
                    .map(|(d, &col)| {
                        row[col]
                            .parse::<u64>()
                            .map_err(|_| ConfigurationError::InvalidField {
                                column: mismatch_column(d),
                                row: i + 1,
                                value: row[col].clone(),
                            })
                    })
                    .collect::<Result<Vec<u64>, _>>()?;

                Ok(GuideRecord {
                    candidate,
                    histogram: MismatchHistogram::from_counts(counts),
                    row: i,
                })
            })
            .collect()
    }

    /// New table holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> GuideTable {
        GuideTable {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Copy of the table without the columns matching `drop`.
    pub fn without_columns<F>(&self, drop: F) -> GuideTable
    where
        F: Fn(&str) -> bool,
    {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&i| !drop(&self.headers[i]))
            .collect();

        GuideTable {
            headers: keep.iter().map(|&i| self.headers[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), GuideTableError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the table so that `path` is either complete or absent.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), GuideTableError> {
        write_atomically(path, |w| self.write(w))
    }
}

/// `true` for headers of the form `MM<digits>`.
pub fn is_mismatch_column(header: &str) -> bool {
    let header = header.trim();
    match (header.get(..2), header.get(2..)) {
        (Some(prefix), Some(digits)) => {
            prefix.eq_ignore_ascii_case("MM")
                && !digits.is_empty()
                && digits.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn parse_score(value: &str, row: usize) -> Result<Option<f64>, ConfigurationError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(score) if score.is_nan() => Ok(None),
        Ok(score) => Ok(Some(score)),
        Err(_) => Err(ConfigurationError::InvalidField {
            column: SCORE_COLUMN.to_string(),
            row: row + 1,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    fn table(text: &str) -> GuideTable {
        GuideTable::from_reader(Cursor::new(text.as_bytes().to_vec())).unwrap()
    }

    #[fixture]
    fn scored_table() -> GuideTable {
        table(
            "Gene,Sequence,Score,Target,MM0,MM1,MM2,MM3,MM4,MM5\n\
             GeneA,acgt,0.9,t1,1,0,0,2,3,4\n\
             GeneB,TTTT,,t2,2,1,0,0,0,0\n",
        )
    }

    #[rstest]
    fn test_candidates_from_table(scored_table: GuideTable) {
        let candidates = scored_table.candidates().unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].sequence, "ACGT");
        assert_eq!(candidates[0].relevance_score, Some(0.9));
        assert_eq!(candidates[0].target.as_deref(), Some("t1"));
        assert_eq!(candidates[1].relevance_score, None);
    }

    #[rstest]
    fn test_guide_records(scored_table: GuideTable) {
        let records = scored_table.guide_records().unwrap();

        assert_eq!(records[0].histogram.counts(), &[1, 0, 0, 2, 3, 4]);
        assert_eq!(records[1].histogram.mm0(), 2);
        assert_eq!(records[1].row, 1);
    }

    #[rstest]
    fn test_missing_columns() {
        let err = table("Gene,Seq\nA,ACGT\n").candidates().unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingColumn(ref c) if c == "Sequence"));

        let err = table("Gene,Sequence,MM0,MM1\nA,ACGT,1,0\n")
            .guide_records()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingColumn(ref c) if c == "MM2"));
    }

    #[rstest]
    fn test_invalid_numbers_are_reported() {
        let err = table("Gene,Sequence,Score\nA,ACGT,high\n")
            .candidates()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidField { row: 1, .. }));

        let err = table("Gene,Sequence,MM0,MM1,MM2\nA,ACGT,1,-1,0\n")
            .guide_records()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidField { ref column, .. } if column == "MM1"
        ));
    }

    #[rstest]
    fn test_header_lookup_is_case_insensitive() {
        let t = table("gene,SEQUENCE\nA,ACGT\n");
        assert_eq!(t.column("Gene"), Some(0));
        assert_eq!(t.get(0, "Sequence"), Some("ACGT"));
        assert_eq!(t.candidates().unwrap().len(), 1);
    }

    #[rstest]
    fn test_select_and_drop_columns(scored_table: GuideTable) {
        let picked = scored_table.select_rows(&[1]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.rows[0][0], "GeneB");

        let trimmed = scored_table.without_columns(is_mismatch_column);
        assert_eq!(trimmed.headers, vec!["Gene", "Sequence", "Score", "Target"]);
        assert_eq!(trimmed.rows[1], vec!["GeneB", "TTTT", "", "t2"]);
    }

    #[rstest]
    fn test_push_row_checks_width() {
        let mut t = GuideTable::new(vec!["Gene".to_string(), "Sequence".to_string()]);
        assert!(t.push_row(vec!["A".to_string(), "ACGT".to_string()]).is_ok());
        assert!(matches!(
            t.push_row(vec!["A".to_string()]),
            Err(GuideTableError::RaggedRow { row: 2, .. })
        ));
    }

    #[rstest]
    fn test_write_header_only_table() {
        let t = GuideTable::new(vec!["Gene".to_string(), "Sequence".to_string()]);
        let mut out = Vec::new();
        t.write(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Gene,Sequence\n");
    }

    #[rstest]
    #[case("MM0", true)]
    #[case("mm12", true)]
    #[case("MM0_Locations", false)]
    #[case("MM", false)]
    fn test_is_mismatch_column(#[case] header: &str, #[case] expected: bool) {
        assert_eq!(is_mismatch_column(header), expected);
    }
}
