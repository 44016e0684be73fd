use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::ConfigurationError;

/// Separator between fields of one serialized [MatchLocation].
pub const LOCATION_FIELD_SEPARATOR: char = '|';
/// Separator between serialized [MatchLocation]s.
pub const LOCATION_SEPARATOR: char = ';';

///
/// Window counts bucketed by exact Hamming distance: `counts[d]` is the number
/// of corpus windows at distance `d` from a candidate.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MismatchHistogram {
    counts: Vec<u64>,
}

impl MismatchHistogram {
    /// All-zero histogram with buckets `0..=max_distance`.
    pub fn new(max_distance: usize) -> Self {
        Self {
            counts: vec![0; max_distance + 1],
        }
    }

    pub fn from_counts(counts: Vec<u64>) -> Self {
        Self { counts }
    }

    pub fn max_distance(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Count at `distance`; zero when the bucket isn't tracked.
    pub fn get(&self, distance: usize) -> u64 {
        self.counts.get(distance).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, distance: usize) {
        if let Some(count) = self.counts.get_mut(distance) {
            *count += 1;
        }
    }

    pub fn mm0(&self) -> u64 {
        self.get(0)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Display for MismatchHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .enumerate()
            .map(|(d, c)| format!("MM{}={}", d, c))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Column header for bucket `distance`, e.g. `MM3`.
pub fn mismatch_column(distance: usize) -> String {
    format!("MM{}", distance)
}

///
/// A transcript holding at least one perfect (distance 0) match of a
/// candidate, with the number of matching positions in it.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchLocation {
    pub transcript_id: String,
    pub gene_symbol: String,
    pub transcript_label: String,
    pub occurrences: u64,
}

impl MatchLocation {
    /// Case-insensitive comparison against the candidate's own gene.
    pub fn is_same_gene(&self, gene_symbol: &str) -> bool {
        self.gene_symbol.eq_ignore_ascii_case(gene_symbol)
    }
}

impl Display for MatchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{id}{sep}{gene}{sep}{label}{sep}{count}",
            id = self.transcript_id,
            gene = self.gene_symbol,
            label = self.transcript_label,
            count = self.occurrences,
            sep = LOCATION_FIELD_SEPARATOR
        )
    }
}

impl FromStr for MatchLocation {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidField {
            column: "MM0_Locations".to_string(),
            row: 0,
            value: s.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(LOCATION_FIELD_SEPARATOR).collect();
        if parts.len() != 4 || parts[0].is_empty() {
            return Err(invalid());
        }

        let occurrences = parts[3].parse::<u64>().map_err(|_| invalid())?;

        Ok(MatchLocation {
            transcript_id: parts[0].to_string(),
            gene_symbol: parts[1].to_string(),
            transcript_label: parts[2].to_string(),
            occurrences,
        })
    }
}

///
/// Perfect matches of one candidate split by whether they fall in the
/// candidate's own gene.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSplit {
    pub same_gene_labels: Vec<String>,
    pub same_gene_occurrences: u64,
    pub other_gene_labels: Vec<String>,
    pub other_gene_occurrences: u64,
}

impl LocationSplit {
    pub fn new(gene_symbol: &str, locations: &[MatchLocation]) -> Self {
        let mut split = LocationSplit::default();
        for location in locations {
            if location.is_same_gene(gene_symbol) {
                split.same_gene_labels.push(location.transcript_label.clone());
                split.same_gene_occurrences += location.occurrences;
            } else {
                split.other_gene_labels.push(location.transcript_label.clone());
                split.other_gene_occurrences += location.occurrences;
            }
        }
        split.same_gene_labels.sort();
        split.other_gene_labels.sort();
        split
    }
}

/// Serialize locations as `id|gene|label|count;id|gene|label|count`.
pub fn format_locations(locations: &[MatchLocation]) -> String {
    locations
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(&LOCATION_SEPARATOR.to_string())
}

/// Inverse of [format_locations]. An empty string means no locations.
pub fn parse_locations(value: &str) -> Result<Vec<MatchLocation>, ConfigurationError> {
    value
        .split(LOCATION_SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .map(MatchLocation::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_histogram_buckets() {
        let mut hist = MismatchHistogram::new(5);
        hist.increment(0);
        hist.increment(2);
        hist.increment(2);
        hist.increment(9);

        assert_eq!(hist.counts(), &[1, 0, 2, 0, 0, 0]);
        assert_eq!(hist.max_distance(), 5);
        assert_eq!(hist.mm0(), 1);
        assert_eq!(hist.get(7), 0);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.to_string(), "MM0=1 MM1=0 MM2=2 MM3=0 MM4=0 MM5=0");
    }

    #[rstest]
    fn test_location_text_form() {
        let locations = vec![
            MatchLocation {
                transcript_id: "ENST1.1".to_string(),
                gene_symbol: "Actb".to_string(),
                transcript_label: "Actb-201".to_string(),
                occurrences: 2,
            },
            MatchLocation {
                transcript_id: "ENST2.1".to_string(),
                gene_symbol: "Actg1".to_string(),
                transcript_label: "Actg1-201".to_string(),
                occurrences: 1,
            },
        ];

        assert!(locations[0].is_same_gene("ACTB"));
        assert!(!locations[1].is_same_gene("Actb"));

        let text = format_locations(&locations);
        assert_eq!(text, "ENST1.1|Actb|Actb-201|2;ENST2.1|Actg1|Actg1-201|1");
        assert_eq!(parse_locations(&text).unwrap(), locations);
        assert_eq!(parse_locations("").unwrap(), vec![]);

        let split = LocationSplit::new("actb", &locations);
        assert_eq!(split.same_gene_labels, vec!["Actb-201"]);
        assert_eq!(split.same_gene_occurrences, 2);
        assert_eq!(split.other_gene_labels, vec!["Actg1-201"]);
        assert_eq!(split.other_gene_occurrences, 1);
    }

    #[rstest]
    #[case("ENST1|Actb|Actb-201")]
    #[case("ENST1|Actb|Actb-201|two")]
    #[case("|Actb|Actb-201|2")]
    fn test_location_rejects_malformed(#[case] value: &str) {
        assert!(value.parse::<MatchLocation>().is_err());
    }
}
