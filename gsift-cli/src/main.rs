mod categorize;
mod config;
mod search;
mod select;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "gsift";
    pub const BIN_NAME: &str = "gsift";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Off-target mismatch search against a transcriptome and selection of the best guides per gene.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v debug, -vv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(search::cli::create_search_cli())
        .subcommand(select::cli::create_select_cli())
        .subcommand(categorize::cli::create_categorize_cli())
}

fn init_logging(matches: &ArgMatches) {
    let log_level = if matches.get_flag("quiet") {
        log::LevelFilter::Warn
    } else {
        match matches.get_count("verbose") {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);
    log::debug!("{} {}", consts::PKG_NAME, consts::VERSION);

    match matches.subcommand() {
        //
        // SEARCH
        //
        Some((search::cli::SEARCH_CMD, matches)) => {
            search::handlers::run_search(matches)?;
        }

        //
        // SELECT
        //
        Some((select::cli::SELECT_CMD, matches)) => {
            select::handlers::run_select(matches)?;
        }

        //
        // CATEGORIZE
        //
        Some((categorize::cli::CATEGORIZE_CMD, matches)) => {
            categorize::handlers::run_categorize(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbosity_is_global() {
        let matches = build_parser()
            .try_get_matches_from(["gsift", "categorize", "in.csv", "out.csv", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
