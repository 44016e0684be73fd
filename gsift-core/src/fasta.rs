use std::collections::HashSet;
use std::io::BufRead;

use crate::errors::CorpusLoadError;
use crate::models::{ReferenceHeader, ReferenceSequence};

///
/// Read every record of a FASTA stream into memory.
///
/// A record starts with a `>` header line and continues with any number of
/// sequence lines, which are concatenated and upper cased. Blank lines and
/// `;` comment lines are skipped. Sequence lines may only hold ASCII letters.
///
/// # Arguments
///
/// - reader: buffered FASTA source (plain or already decompressed)
///
/// # Errors
///
/// - sequence data before the first header
/// - a header with no transcript id
/// - a transcript id seen twice
/// - a non-letter character inside a sequence line
///
pub fn read_reference<R: BufRead>(
    mut reader: R,
) -> Result<Vec<ReferenceSequence>, CorpusLoadError> {
    let mut sequences: Vec<ReferenceSequence> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut current: Option<(ReferenceHeader, Vec<u8>)> = None;

    let mut line: Vec<u8> = Vec::new();
    let mut line_number = 0_usize;

    loop {
        line.clear();
        let bytes_read = reader.read_until(b'\n', &mut line)?;
        if bytes_read == 0 {
            break;
        }
        line_number += 1;

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() || trimmed[0] == b';' {
            continue;
        }

        if trimmed[0] == b'>' {
            if let Some((header, bases)) = current.take() {
                sequences.push(ReferenceSequence::from_header(header, bases));
            }

            let text = String::from_utf8_lossy(trimmed);
            let header = ReferenceHeader::parse(&text).ok_or(CorpusLoadError::EmptyId {
                line: line_number,
            })?;

            if !seen_ids.insert(header.id.clone()) {
                return Err(CorpusLoadError::DuplicateId {
                    id: header.id,
                    line: line_number,
                });
            }

            current = Some((header, Vec::new()));
            continue;
        }

        let Some((header, bases)) = current.as_mut() else {
            return Err(CorpusLoadError::MissingHeader { line: line_number });
        };

        if let Some(&bad) = trimmed.iter().find(|b| !b.is_ascii_alphabetic()) {
            return Err(CorpusLoadError::InvalidCharacter {
                id: header.id.clone(),
                line: line_number,
                character: bad as char,
            });
        }

        bases.extend(trimmed.iter().map(|b| b.to_ascii_uppercase()));
    }

    if let Some((header, bases)) = current.take() {
        sequences.push(ReferenceSequence::from_header(header, bases));
    }

    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Vec<ReferenceSequence>, CorpusLoadError> {
        read_reference(Cursor::new(text.as_bytes().to_vec()))
    }

    #[rstest]
    fn test_multiline_records_are_joined() {
        let records = read(">tx1\nACGT\nacgt\n\n>tx2|G|x|y|Foo-201|Foo|\r\nNNAC\r\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "tx1");
        assert_eq!(records[0].bases, b"ACGTACGT".to_vec());
        assert_eq!(records[1].id, "tx2");
        assert_eq!(records[1].gene_symbol, "Foo");
        assert_eq!(records[1].transcript_label, "Foo-201");
        assert_eq!(records[1].bases, b"NNAC".to_vec());
    }

    #[rstest]
    fn test_header_without_sequence_is_kept() {
        let records = read(">tx1\n>tx2\nAC\n").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
    }

    #[rstest]
    fn test_empty_input_is_empty_corpus() {
        assert_eq!(read("").unwrap().len(), 0);
        assert_eq!(read("\n\n").unwrap().len(), 0);
    }

    #[rstest]
    fn test_sequence_before_header() {
        let err = read("ACGT\n>tx1\nACGT\n").unwrap_err();
        assert!(matches!(err, CorpusLoadError::MissingHeader { line: 1 }));
    }

    #[rstest]
    fn test_invalid_character() {
        let err = read(">tx1\nAC1T\n").unwrap_err();
        match err {
            CorpusLoadError::InvalidCharacter { id, line, character } => {
                assert_eq!(id, "tx1");
                assert_eq!(line, 2);
                assert_eq!(character, '1');
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_duplicate_and_empty_ids() {
        let err = read(">tx1\nAC\n>tx1\nGT\n").unwrap_err();
        assert!(matches!(err, CorpusLoadError::DuplicateId { line: 3, .. }));

        let err = read(">\nAC\n").unwrap_err();
        assert!(matches!(err, CorpusLoadError::EmptyId { line: 1 }));
    }
}
