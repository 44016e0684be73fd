use std::fmt::{self, Display};

use crate::errors::ConfigurationError;

///
/// A guide sequence to be checked against the reference corpus.
///
/// Sequences are stored upper case. Uniqueness is not enforced here: the same
/// (gene, sequence) pair may legitimately appear more than once.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub gene_symbol: String,
    pub sequence: String,
    pub relevance_score: Option<f64>,
    /// Originating target region, when the caller tracks one.
    pub target: Option<String>,
}

impl Candidate {
    pub fn new(gene_symbol: impl Into<String>, sequence: impl AsRef<str>) -> Self {
        Self {
            gene_symbol: gene_symbol.into(),
            sequence: sequence.as_ref().trim().to_ascii_uppercase(),
            relevance_score: None,
            target: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.gene_symbol, self.sequence)
    }
}

///
/// Check that a batch of candidates can be searched together.
///
/// Every sequence must be non-empty, made of `ACGTN` only and share a single
/// length. Returns that length, or `None` for an empty batch.
///
pub fn validate_candidates(candidates: &[Candidate]) -> Result<Option<usize>, ConfigurationError> {
    let mut expected: Option<usize> = None;

    for candidate in candidates {
        if candidate.is_empty() {
            return Err(ConfigurationError::EmptyCandidate {
                gene: candidate.gene_symbol.clone(),
            });
        }

        if let Some(base) = candidate
            .sequence
            .chars()
            .find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T' | 'N'))
        {
            return Err(ConfigurationError::InvalidCandidateBase {
                gene: candidate.gene_symbol.clone(),
                sequence: candidate.sequence.clone(),
                base,
            });
        }

        match expected {
            None => expected = Some(candidate.len()),
            Some(len) if len != candidate.len() => {
                return Err(ConfigurationError::MixedCandidateLengths {
                    gene: candidate.gene_symbol.clone(),
                    sequence: candidate.sequence.clone(),
                    expected: len,
                    found: candidate.len(),
                });
            }
            Some(_) => {}
        }
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_candidate_is_normalized() {
        let candidate = Candidate::new("GeneA", " acgtACGT\n").with_score(0.9);
        assert_eq!(candidate.sequence, "ACGTACGT");
        assert_eq!(candidate.relevance_score, Some(0.9));
        assert_eq!(candidate.to_string(), "GeneA:ACGTACGT");
    }

    #[rstest]
    fn test_validate_candidates_shared_length() {
        let candidates = vec![Candidate::new("A", "ACGT"), Candidate::new("B", "TTNA")];
        assert_eq!(validate_candidates(&candidates).unwrap(), Some(4));
        assert_eq!(validate_candidates(&[]).unwrap(), None);
    }

    #[rstest]
    fn test_validate_candidates_mixed_lengths() {
        let candidates = vec![Candidate::new("A", "ACGT"), Candidate::new("B", "ACGTA")];
        let err = validate_candidates(&candidates).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MixedCandidateLengths {
                expected: 4,
                found: 5,
                ..
            }
        ));
    }

    #[rstest]
    #[case("ACGU", 'U')]
    #[case("AC-T", '-')]
    fn test_validate_candidates_invalid_base(#[case] sequence: &str, #[case] bad: char) {
        let err = validate_candidates(&[Candidate::new("A", sequence)]).unwrap_err();
        match err {
            ConfigurationError::InvalidCandidateBase { base, .. } => assert_eq!(base, bad),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_validate_candidates_empty_sequence() {
        let err = validate_candidates(&[Candidate::new("A", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyCandidate { .. }));
    }
}
