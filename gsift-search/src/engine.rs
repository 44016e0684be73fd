use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;

use gsift_core::Result;
use gsift_core::errors::{ConfigurationError, ExecutionError};
use gsift_core::models::{
    Candidate, DataQualityWarning, MatchLocation, MismatchHistogram, ReferenceCorpus,
    ReferenceSequence, validate_candidates,
};

use crate::cancel::CancellationToken;
use crate::hamming::{bounded_hamming, encode_query};
use crate::options::SearchOptions;

///
/// Everything the engine found for one candidate.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateHits {
    /// Position of the candidate in the searched batch.
    pub index: usize,
    pub candidate: Candidate,
    pub histogram: MismatchHistogram,
    /// Transcripts with at least one perfect match, in corpus order.
    pub locations: Vec<MatchLocation>,
}

impl CandidateHits {
    /// Sum of per-transcript occurrences; always equal to `MM0`.
    pub fn total_occurrences(&self) -> u64 {
        self.locations.iter().map(|l| l.occurrences).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Complete,
    /// The scan was cancelled after `scanned` of `total` candidates.
    Incomplete { scanned: usize, total: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Hits ordered by candidate index.
    pub hits: Vec<CandidateHits>,
    pub status: ScanStatus,
    pub max_mismatches: usize,
}

impl SearchResults {
    fn empty(max_mismatches: usize) -> Self {
        SearchResults {
            hits: Vec::new(),
            status: ScanStatus::Complete,
            max_mismatches,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == ScanStatus::Complete
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Candidates without a single perfect match in the corpus.
    pub fn warnings(&self) -> Vec<DataQualityWarning> {
        self.hits
            .iter()
            .filter(|h| h.histogram.mm0() == 0)
            .map(|h| DataQualityWarning::NoSelfMatch {
                gene: h.candidate.gene_symbol.clone(),
                sequence: h.candidate.sequence.clone(),
            })
            .collect()
    }
}

///
/// Counts, for every candidate, the corpus windows within `max_mismatches`
/// substitutions of it.
///
/// The engine owns a dedicated worker pool and a shared handle on the corpus,
/// so one engine can serve any number of batches.
///
pub struct MatchEngine {
    corpus: Arc<ReferenceCorpus>,
    options: SearchOptions,
    pool: rayon::ThreadPool,
}

impl MatchEngine {
    pub fn new(corpus: impl Into<Arc<ReferenceCorpus>>, options: SearchOptions) -> Result<Self> {
        options.validate()?;

        let threads = options.resolved_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ExecutionError::ThreadPool(e.to_string()))?;

        debug!("Built search pool with {} threads", threads);

        Ok(MatchEngine {
            corpus: corpus.into(),
            options,
            pool,
        })
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Search the whole batch. Never returns an incomplete result.
    pub fn search(&self, candidates: &[Candidate]) -> Result<SearchResults> {
        self.search_with_cancel(candidates, &CancellationToken::new())
    }

    ///
    /// Search the batch, checking `token` before each candidate. Once it fires
    /// the remaining candidates are skipped and the status is
    /// [ScanStatus::Incomplete].
    ///
    pub fn search_with_cancel(
        &self,
        candidates: &[Candidate],
        token: &CancellationToken,
    ) -> Result<SearchResults> {
        self.search_offset(candidates, 0, token)
    }

    ///
    /// Search the batch `chunk_size` candidates at a time and concatenate the
    /// results. Bounds the memory held by in-flight results on very large
    /// inputs.
    ///
    pub fn search_chunked(
        &self,
        candidates: &[Candidate],
        chunk_size: usize,
        token: &CancellationToken,
    ) -> Result<SearchResults> {
        if chunk_size == 0 {
            return Err(ConfigurationError::InvalidChunkSize.into());
        }
        // validate up front so a bad row late in the input fails before any work
        validate_candidates(candidates)?;

        let total = candidates.len();
        let chunks = total.div_ceil(chunk_size);
        let mut merged = SearchResults::empty(self.options.max_mismatches);

        for (i, chunk) in candidates.chunks(chunk_size).enumerate() {
            info!(
                "Chunk {}/{}: {} candidates",
                i + 1,
                chunks,
                chunk.len()
            );

            let results = self.search_offset(chunk, i * chunk_size, token)?;
            let complete = results.is_complete();
            merged.hits.extend(results.hits);

            if !complete {
                merged.status = ScanStatus::Incomplete {
                    scanned: merged.hits.len(),
                    total,
                };
                break;
            }
        }

        Ok(merged)
    }

    fn search_offset(
        &self,
        candidates: &[Candidate],
        offset: usize,
        token: &CancellationToken,
    ) -> Result<SearchResults> {
        let k = self.options.max_mismatches;

        let width = match validate_candidates(candidates)? {
            Some(width) => width,
            None => return Ok(SearchResults::empty(k)),
        };
        if k >= width {
            return Err(ConfigurationError::MismatchesExceedLength {
                max_mismatches: k,
                length: width,
            }
            .into());
        }

        let total = candidates.len();
        let parts = self.threads().min(total).max(1);
        let part_size = total.div_ceil(parts);

        debug!(
            "Scanning {} candidates (length {}) against {} windows in {} partitions",
            total,
            width,
            self.corpus.window_count(width),
            parts
        );

        let bar = self.progress_bar(total);

        let partitions: Vec<Vec<CandidateHits>> = self.pool.install(|| {
            candidates
                .par_chunks(part_size)
                .enumerate()
                .map(|(p, part)| {
                    let start = offset + p * part_size;
                    let mut found = Vec::with_capacity(part.len());
                    for (i, candidate) in part.iter().enumerate() {
                        if token.is_cancelled() {
                            break;
                        }
                        found.push(scan_candidate(
                            &self.corpus,
                            start + i,
                            candidate,
                            width,
                            k,
                        ));
                        bar.inc(1);
                    }
                    found
                })
                .collect()
        });

        bar.finish_and_clear();

        let hits: Vec<CandidateHits> = partitions.into_iter().flatten().collect();
        let status = if hits.len() == total {
            ScanStatus::Complete
        } else {
            warn!("Search cancelled after {} of {} candidates", hits.len(), total);
            ScanStatus::Incomplete {
                scanned: hits.len(),
                total,
            }
        };

        Ok(SearchResults {
            hits,
            status,
            max_mismatches: k,
        })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message("candidates");
        bar
    }
}

///
/// One-shot search with a throwaway engine.
///
/// # Arguments
/// - candidates: guides of one shared length
/// - corpus: reference transcripts
/// - options: K, thread count and progress settings
///
pub fn search(
    candidates: &[Candidate],
    corpus: impl Into<Arc<ReferenceCorpus>>,
    options: SearchOptions,
) -> Result<SearchResults> {
    MatchEngine::new(corpus, options)?.search(candidates)
}

fn scan_candidate(
    corpus: &ReferenceCorpus,
    index: usize,
    candidate: &Candidate,
    width: usize,
    max_mismatches: usize,
) -> CandidateHits {
    let query = encode_query(&candidate.sequence);
    let mut histogram = MismatchHistogram::new(max_mismatches);
    let mut locations = Vec::new();

    for reference in corpus {
        let exact = scan_reference(&query, reference, width, max_mismatches, &mut histogram);
        if exact > 0 {
            locations.push(MatchLocation {
                transcript_id: reference.id.clone(),
                gene_symbol: reference.gene_symbol.clone(),
                transcript_label: reference.transcript_label.clone(),
                occurrences: exact,
            });
        }
    }

    CandidateHits {
        index,
        candidate: candidate.clone(),
        histogram,
        locations,
    }
}

/// Adds every window of `reference` to `histogram`; returns the exact hits.
fn scan_reference(
    query: &[u8],
    reference: &ReferenceSequence,
    width: usize,
    max_mismatches: usize,
    histogram: &mut MismatchHistogram,
) -> u64 {
    let mut exact = 0;
    for window in reference.bases.windows(width) {
        if let Some(distance) = bounded_hamming(query, window, max_mismatches) {
            histogram.increment(distance);
            if distance == 0 {
                exact += 1;
            }
        }
    }
    exact
}
