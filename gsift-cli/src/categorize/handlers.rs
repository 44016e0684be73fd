use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use gsift_core::guide_table::GuideTable;
use gsift_core::utils::write_atomically;
use gsift_select::categorize::reports_to_table;
use gsift_select::{CategorySummary, categorize_table};

pub fn run_categorize(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("An extended search table is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let table = GuideTable::from_path(input)?;
    let reports = categorize_table(&table)?;

    let summary = CategorySummary::new(&reports);
    summary.log();

    let out = reports_to_table(&reports)?;
    out.write_to_path(output)
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Wrote {} rows to {}", out.len(), output);

    if let Some(path) = matches.get_one::<String>("summary") {
        write_atomically(path, |w| -> Result<()> {
            serde_json::to_writer_pretty(w, &summary)?;
            Ok(())
        })
        .with_context(|| format!("Failed to write summary {}", path))?;
    }

    Ok(())
}
