use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use gsift_core::guide_table::GuideTable;
use gsift_core::models::ReferenceCorpus;
use gsift_search::{CancellationToken, MatchEngine, ScanStatus, SearchOptions, results_to_table};

use crate::config::GsiftConfig;

pub fn run_search(matches: &ArgMatches) -> Result<()> {
    // get arguments from CLI
    let guides = matches
        .get_one::<String>("guides")
        .context("A guide table is required.")?;
    let reference = matches
        .get_one::<String>("reference")
        .context("A reference FASTA is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    // flags win over the config file
    let config = GsiftConfig::load(matches.get_one::<String>("config"))?.search;
    let max_mismatches = matches
        .get_one::<usize>("max_mismatches")
        .copied()
        .unwrap_or(config.max_mismatches);
    let chunk_size = matches
        .get_one::<usize>("chunk_size")
        .copied()
        .unwrap_or(config.chunk_size);
    let threads = matches.get_one::<usize>("threads").copied().or(config.threads);
    let extended = matches.get_flag("extended") || config.extended;

    let mut options = SearchOptions::default()
        .with_max_mismatches(max_mismatches)
        .with_progress(matches.get_flag("progress"));
    if let Some(threads) = threads {
        options = options.with_threads(threads);
    }

    let token = match matches.get_one::<u64>("timeout") {
        Some(&secs) => CancellationToken::new().with_timeout(Duration::from_secs(secs)),
        None => CancellationToken::new(),
    };

    // load everything up front so bad input fails before the scan starts
    let table = GuideTable::from_path(guides)?;
    let candidates = table.candidates()?;
    let corpus = Arc::new(ReferenceCorpus::try_from(reference.as_str())?);

    let engine = MatchEngine::new(corpus, options)?;
    info!(
        "Searching {} guides against {} transcripts (K={}, {} threads)",
        candidates.len(),
        engine.corpus().len(),
        max_mismatches,
        engine.threads()
    );

    let results = engine.search_chunked(&candidates, chunk_size, &token)?;
    if let ScanStatus::Incomplete { scanned, total } = results.status {
        anyhow::bail!(
            "Search stopped after {} of {} guides; no output written",
            scanned,
            total
        );
    }

    for warning in results.warnings() {
        warn!("{}", warning);
    }

    let out = results_to_table(&table, &results, extended)?;
    out.write_to_path(output)
        .with_context(|| format!("Failed to write {}", output))?;

    info!("Wrote {} rows to {}", out.len(), output);

    Ok(())
}
