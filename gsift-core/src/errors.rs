use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Inputs that are malformed or inconsistent before any work starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error(
        "Candidate sequences must share one length: {sequence} ({gene}) has length {found}, expected {expected}"
    )]
    MixedCandidateLengths {
        gene: String,
        sequence: String,
        expected: usize,
        found: usize,
    },

    #[error("Candidate for gene {gene} has an empty sequence")]
    EmptyCandidate { gene: String },

    #[error("Invalid base {base:?} in candidate {sequence} for gene {gene}")]
    InvalidCandidateBase {
        gene: String,
        sequence: String,
        base: char,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidField {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    #[error("Maximum mismatches must be between 1 and {max}, got {found}")]
    InvalidMaxMismatches { found: usize, max: usize },

    #[error("Maximum mismatches ({max_mismatches}) must be smaller than the candidate length ({length})")]
    MismatchesExceedLength { max_mismatches: usize, length: usize },

    #[error("Thread count must be at least 1")]
    InvalidThreadCount,

    #[error("Chunk size must be at least 1")]
    InvalidChunkSize,

    #[error("Invalid config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },
}

/// The reference corpus is missing, unreadable or not valid FASTA.
#[derive(Error, Debug)]
pub enum CorpusLoadError {
    #[error("Can't read reference corpus {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Sequence data before the first header at line {line}")]
    MissingHeader { line: usize },

    #[error("Empty transcript id in header at line {line}")]
    EmptyId { line: usize },

    #[error("Invalid character {character:?} in transcript {id} at line {line}")]
    InvalidCharacter {
        id: String,
        line: usize,
        character: char,
    },

    #[error("Duplicate transcript id {id} at line {line}")]
    DuplicateId { id: String, line: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures while a scan is running, including a subordinate search process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to read results produced by {program}: {reason}")]
    Output { program: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Tabular guide files that can't be read or written.
#[derive(Error, Debug)]
pub enum GuideTableError {
    #[error("Can't read guide table {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Umbrella error for callers that drive a whole run.
#[derive(Error, Debug)]
pub enum GsiftError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    CorpusLoad(#[from] CorpusLoadError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    GuideTable(#[from] GuideTableError),
}

pub type Result<T> = std::result::Result<T, GsiftError>;
