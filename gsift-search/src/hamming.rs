//! Window comparison primitives.
//!
//! Candidates are encoded once so that any non-`ACGT` base can never compare
//! equal to a reference byte. Reference bytes are used as loaded: ambiguous
//! letters there (`N`, `R`, ...) never equal an encoded `A/C/G/T`, so they are
//! mismatches without any extra check in the inner loop.

use gsift_core::utils::is_acgt;

/// Byte used for ambiguous candidate positions. Not an ASCII letter, so it
/// can't occur in a loaded reference.
pub const AMBIGUOUS_QUERY_BASE: u8 = 0xFE;

/// Encode an upper case candidate sequence for [bounded_hamming].
pub fn encode_query(sequence: &str) -> Vec<u8> {
    sequence
        .bytes()
        .map(|b| if is_acgt(b) { b } else { AMBIGUOUS_QUERY_BASE })
        .collect()
}

///
/// Hamming distance between `query` and `window`, giving up as soon as it
/// exceeds `max`. Both slices must have the same length.
///
/// # Returns
///
/// `Some(distance)` when `distance <= max`, `None` otherwise.
///
#[inline]
pub fn bounded_hamming(query: &[u8], window: &[u8], max: usize) -> Option<usize> {
    debug_assert_eq!(query.len(), window.len());

    let mut mismatches = 0;
    for (q, w) in query.iter().zip(window) {
        if q != w {
            mismatches += 1;
            if mismatches > max {
                return None;
            }
        }
    }
    Some(mismatches)
}
