use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use gsift_core::guide_table::GuideTable;
use gsift_core::utils::write_atomically;
use gsift_select::{SelectionConfig, SelectionPipeline};

use crate::config::GsiftConfig;

/// Config file values overridden by whatever was given on the command line.
fn selection_config(matches: &ArgMatches) -> Result<SelectionConfig> {
    let mut config = GsiftConfig::load(matches.get_one::<String>("config"))?.selection;

    if let Some(&min_score) = matches.get_one::<f64>("min_score") {
        config.min_score = min_score;
    }
    if let Some(&mm1) = matches.get_one::<u64>("mm1") {
        config.mm1_ceiling = mm1;
    }
    if let Some(&mm2) = matches.get_one::<u64>("mm2") {
        config.mm2_ceiling = mm2;
    }
    if let Some(&tolerance) = matches.get_one::<u64>("mm0_tolerance") {
        config.mm0_tolerance = tolerance;
    }
    if matches.get_flag("no-adaptive-mm0") {
        config.adaptive_mm0 = false;
    }
    if let Some(&top_n) = matches.get_one::<usize>("top_n") {
        config.top_n = top_n;
    }

    Ok(config)
}

pub fn run_select(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("A search output table is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let pipeline = SelectionPipeline::new(selection_config(matches)?)?;
    info!("Selection settings: {:?}", pipeline.config());

    let table = GuideTable::from_path(input)?;
    let (selected, outcome) = pipeline.run_table(&table)?;
    outcome.log();

    selected
        .write_to_path(output)
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote {} guides to {}", selected.len(), output);

    if let Some(summary) = matches.get_one::<String>("summary") {
        write_atomically(summary, |w| -> Result<()> {
            serde_json::to_writer_pretty(w, &outcome.summary(pipeline.config()))?;
            Ok(())
        })
        .with_context(|| format!("Failed to write summary {}", summary))?;
    }

    Ok(())
}
