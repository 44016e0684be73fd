use std::path::{Path, PathBuf};
use std::slice::Iter;

use log::info;

use crate::errors::CorpusLoadError;
use crate::fasta::read_reference;
use crate::models::ReferenceSequence;
use crate::utils::get_dynamic_reader;

///
/// ReferenceCorpus struct, the in-memory transcriptome every candidate is
/// compared against. Loaded once, never mutated afterwards.
///
#[derive(Clone, Debug, Default)]
pub struct ReferenceCorpus {
    pub sequences: Vec<ReferenceSequence>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for ReferenceCorpus {
    type Error = CorpusLoadError;

    ///
    /// Load a corpus from a (optionally gzipped) FASTA file.
    ///
    /// # Arguments:
    /// - value: path to the FASTA file on disk.
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let reader = get_dynamic_reader(value).map_err(|source| CorpusLoadError::Unreadable {
            path: value.to_path_buf(),
            source,
        })?;

        let sequences = read_reference(reader).map_err(|err| match err {
            CorpusLoadError::Io(source) => CorpusLoadError::Unreadable {
                path: value.to_path_buf(),
                source,
            },
            other => other,
        })?;

        let corpus = ReferenceCorpus {
            sequences,
            path: Some(value.to_path_buf()),
        };

        info!(
            "Loaded reference: {} transcripts, {} bp from {}",
            corpus.len(),
            corpus.total_bases(),
            value.display()
        );

        Ok(corpus)
    }
}

impl TryFrom<&str> for ReferenceCorpus {
    type Error = CorpusLoadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ReferenceCorpus::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for ReferenceCorpus {
    type Error = CorpusLoadError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        ReferenceCorpus::try_from(value.as_path())
    }
}

impl From<Vec<ReferenceSequence>> for ReferenceCorpus {
    fn from(sequences: Vec<ReferenceSequence>) -> Self {
        ReferenceCorpus {
            sequences,
            path: None,
        }
    }
}

impl<'a> IntoIterator for &'a ReferenceCorpus {
    type Item = &'a ReferenceSequence;
    type IntoIter = Iter<'a, ReferenceSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

impl ReferenceCorpus {
    pub fn iter(&self) -> Iter<'_, ReferenceSequence> {
        self.sequences.iter()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn total_bases(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).sum()
    }

    /// Windows of `width` bases summed over all transcripts.
    pub fn window_count(&self, width: usize) -> usize {
        self.sequences.iter().map(|s| s.window_count(width)).sum()
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceSequence> {
        self.sequences.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn path_to_reference() -> &'static str {
        "../tests/data/reference.fa"
    }

    #[fixture]
    fn path_to_gencode_reference() -> &'static str {
        "../tests/data/gencode_like.fa.gz"
    }

    #[rstest]
    fn test_load_reference(path_to_reference: &str) {
        let corpus = ReferenceCorpus::try_from(path_to_reference).unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.total_bases(), 60);
        assert_eq!(corpus.window_count(20), 3);
        assert_eq!(corpus.get("tx2").unwrap().bases, b"ACGTACGTACGTACGAACGA".to_vec());
        assert_eq!(corpus.path, Some(PathBuf::from(path_to_reference)));
    }

    #[rstest]
    fn test_load_gzipped_reference(path_to_gencode_reference: &str) {
        let corpus = ReferenceCorpus::try_from(path_to_gencode_reference).unwrap();

        let genes: Vec<&str> = corpus.iter().map(|s| s.gene_symbol.as_str()).collect();
        assert_eq!(genes, vec!["Actb", "Actb", "Actg1", "Gapdh"]);
        assert_eq!(corpus.sequences[1].transcript_label, "Actb-202");
    }

    #[rstest]
    fn test_missing_reference_is_unreadable() {
        let err = ReferenceCorpus::try_from("../tests/data/does_not_exist.fa").unwrap_err();
        assert!(matches!(err, CorpusLoadError::Unreadable { .. }));
    }

    #[rstest]
    fn test_malformed_reference() {
        let err = ReferenceCorpus::try_from("../tests/data/malformed.fa").unwrap_err();
        assert!(matches!(err, CorpusLoadError::MissingHeader { line: 1 }));
    }
}
