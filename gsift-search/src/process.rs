use std::ffi::OsString;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use tempfile::TempDir;

use gsift_core::Result;
use gsift_core::errors::{ConfigurationError, ExecutionError, GsiftError};
use gsift_core::guide_table::GuideTable;

use crate::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MISMATCHES, THREADS_ENV_VAR};

const CHUNK_INPUT: &str = "guides.csv";
const CHUNK_OUTPUT: &str = "hits.csv";

///
/// Drives an external search executable that speaks the
/// `<guides.csv> <reference.fa> <output.csv>` protocol, one bounded chunk of
/// guides at a time, and stitches the outputs back together in input order.
///
/// Each chunk lives in its own temporary directory, which is removed whether
/// the child succeeds or not.
///
#[derive(Debug, Clone)]
pub struct ProcessSearcher {
    program: PathBuf,
    args: Vec<OsString>,
    reference: PathBuf,
    threads: Option<usize>,
    max_mismatches: usize,
    chunk_size: usize,
    extended: bool,
}

impl ProcessSearcher {
    pub fn new(program: impl Into<PathBuf>, reference: impl Into<PathBuf>) -> Self {
        ProcessSearcher {
            program: program.into(),
            args: Vec::new(),
            reference: reference.into(),
            threads: None,
            max_mismatches: DEFAULT_MAX_MISMATCHES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            extended: false,
        }
    }

    /// Arguments placed before the positional ones, e.g. a subcommand name.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Passed to the child through the environment.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_max_mismatches(mut self, max_mismatches: usize) -> Self {
        self.max_mismatches = max_mismatches;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    ///
    /// Search every row of `guides`. The merged table has one output row per
    /// input row, in the same order.
    ///
    pub fn run(&self, guides: &GuideTable) -> Result<GuideTable> {
        if self.chunk_size == 0 {
            return Err(ConfigurationError::InvalidChunkSize.into());
        }

        let ranges = chunk_ranges(guides.len(), self.chunk_size);
        let mut merged: Option<GuideTable> = None;

        for (i, range) in ranges.iter().enumerate() {
            info!(
                "Running {} on chunk {}/{} ({} guides)",
                self.program_name(),
                i + 1,
                ranges.len(),
                range.len()
            );

            let indices: Vec<usize> = range.clone().collect();
            let output = self.run_chunk(&guides.select_rows(&indices))?;

            match merged.as_mut() {
                None => merged = Some(output),
                Some(table) => {
                    if table.headers != output.headers {
                        return Err(self.output_error(format!(
                            "chunk {} has columns {:?}, expected {:?}",
                            i + 1,
                            output.headers,
                            table.headers
                        )));
                    }
                    table.rows.extend(output.rows);
                }
            }
        }

        merged.ok_or_else(|| self.output_error("no chunks were run".to_string()))
    }

    fn run_chunk(&self, chunk: &GuideTable) -> Result<GuideTable> {
        let workdir = TempDir::new().map_err(ExecutionError::from)?;
        let input = workdir.path().join(CHUNK_INPUT);
        let output = workdir.path().join(CHUNK_OUTPUT);

        chunk
            .write_to_path(&input)
            .map_err(|e| self.output_error(format!("can't stage chunk input: {}", e)))?;

        let mut command = self.command(&input, &output);
        debug!("Spawning {:?}", command);

        let result = command.output().map_err(|source| ExecutionError::Spawn {
            program: self.program_name(),
            source,
        })?;

        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        if !result.status.success() {
            return Err(ExecutionError::NonZeroExit {
                program: self.program_name(),
                status: result.status.to_string(),
                stderr,
            }
            .into());
        }
        for line in stderr.lines() {
            debug!("[{}] {}", self.program_name(), line);
        }

        let table = GuideTable::from_path(&output)
            .map_err(|e| self.output_error(e.to_string()))?;

        if table.len() != chunk.len() {
            return Err(self.output_error(format!(
                "expected {} rows, got {}",
                chunk.len(),
                table.len()
            )));
        }

        Ok(table)
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(input)
            .arg(&self.reference)
            .arg(output)
            .arg("--max-mismatches")
            .arg(self.max_mismatches.to_string());
        if self.extended {
            command.arg("--extended");
        }
        if let Some(threads) = self.threads {
            command.env(THREADS_ENV_VAR, threads.to_string());
        }
        command
    }

    fn output_error(&self, reason: String) -> GsiftError {
        ExecutionError::Output {
            program: self.program_name(),
            reason,
        }
        .into()
    }
}

/// Contiguous row ranges of at most `size`; a single empty range for no rows.
fn chunk_ranges(len: usize, size: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return vec![0..0];
    }
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}
