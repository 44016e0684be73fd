use std::fmt::{self, Display};

pub const UNKNOWN_GENE: &str = "Unknown";

/// Field positions inside a GENCODE style, pipe delimited transcript header.
const TRANSCRIPT_NAME_FIELD: usize = 4;
const GENE_SYMBOL_FIELD: usize = 5;

///
/// The identifying part of a reference FASTA header.
///
/// Headers look like
/// `ENSMUST00000193812.2|ENSMUSG00000102693.2|...|4933401J01Rik-201|4933401J01Rik|...`.
/// Only the first field is required; plain headers (`>tx1 some description`)
/// fall back to the id for the label and [UNKNOWN_GENE] for the gene.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceHeader {
    pub id: String,
    pub gene_symbol: String,
    pub transcript_label: String,
}

impl ReferenceHeader {
    /// Parse a header line, with or without the leading `>`.
    /// Returns `None` when there is no transcript id.
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim().trim_start_matches('>').trim();
        let fields: Vec<&str> = header.split('|').collect();

        let id = fields[0].split_whitespace().next()?.to_string();

        let transcript_label = fields
            .get(TRANSCRIPT_NAME_FIELD)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| strip_version(&id).to_string());

        let gene_symbol = fields
            .get(GENE_SYMBOL_FIELD)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_GENE)
            .to_string();

        Some(ReferenceHeader {
            id,
            gene_symbol,
            transcript_label,
        })
    }
}

fn strip_version(id: &str) -> &str {
    id.split('.').next().unwrap_or(id)
}

///
/// One transcript of the reference corpus. Bases are stored as upper case
/// ASCII; anything outside `ACGT` never matches during a search.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    pub id: String,
    pub gene_symbol: String,
    pub transcript_label: String,
    pub bases: Vec<u8>,
}

impl ReferenceSequence {
    pub fn new(
        id: impl Into<String>,
        gene_symbol: impl Into<String>,
        transcript_label: impl Into<String>,
        bases: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            id: id.into(),
            gene_symbol: gene_symbol.into(),
            transcript_label: transcript_label.into(),
            bases: bases.as_ref().to_ascii_uppercase(),
        }
    }

    pub fn from_header(header: ReferenceHeader, bases: Vec<u8>) -> Self {
        Self::new(header.id, header.gene_symbol, header.transcript_label, bases)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Number of windows of `width` bases, zero when the transcript is shorter.
    pub fn window_count(&self, width: usize) -> usize {
        if width == 0 || self.bases.len() < width {
            0
        } else {
            self.bases.len() - width + 1
        }
    }
}

impl Display for ReferenceSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {} bp)",
            self.id,
            self.transcript_label,
            self.gene_symbol,
            self.bases.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parse_gencode_header() {
        let header = ReferenceHeader::parse(
            ">ENSMUST00000193812.2|ENSMUSG00000102693.2|OTTMUSG00000049935.1|OTTMUST00000127109.1|4933401J01Rik-201|4933401J01Rik|1070|TEC|",
        )
        .unwrap();

        assert_eq!(header.id, "ENSMUST00000193812.2");
        assert_eq!(header.transcript_label, "4933401J01Rik-201");
        assert_eq!(header.gene_symbol, "4933401J01Rik");
    }

    #[rstest]
    #[case(">tx1", "tx1", "tx1", UNKNOWN_GENE)]
    #[case(">tx1 some description", "tx1", "tx1", UNKNOWN_GENE)]
    #[case(">ENST0001.5|ENSG0001.1", "ENST0001.5", "ENST0001", UNKNOWN_GENE)]
    #[case("ENST0002|G|x|y||Actb", "ENST0002", "ENST0002", "Actb")]
    fn test_parse_short_headers(
        #[case] line: &str,
        #[case] id: &str,
        #[case] label: &str,
        #[case] gene: &str,
    ) {
        let header = ReferenceHeader::parse(line).unwrap();
        assert_eq!(header.id, id);
        assert_eq!(header.transcript_label, label);
        assert_eq!(header.gene_symbol, gene);
    }

    #[rstest]
    #[case(">")]
    #[case(">   ")]
    #[case(">|ENSG|x")]
    fn test_parse_header_without_id(#[case] line: &str) {
        assert!(ReferenceHeader::parse(line).is_none());
    }

    #[rstest]
    fn test_reference_sequence_is_upper_case() {
        let seq = ReferenceSequence::new("tx1", "GeneA", "GeneA-201", "acgtn");
        assert_eq!(seq.bases, b"ACGTN".to_vec());
        assert_eq!(seq.window_count(3), 3);
        assert_eq!(seq.window_count(6), 0);
    }
}
