use clap::{Arg, ArgAction, Command, arg};

use gsift_search::consts::THREADS_ENV_VAR;

pub const SEARCH_CMD: &str = "search";

pub fn create_search_cli() -> Command {
    Command::new(SEARCH_CMD)
        .author("Databio")
        .about("Count reference windows within K mismatches of every guide and write the MM0..MMK histogram.")
        .arg(
            Arg::new("guides")
                .help("Guide table (CSV with Gene and Sequence columns, '-' for stdin)")
                .required(true),
        )
        .arg(
            Arg::new("reference")
                .help("Reference transcriptome FASTA, optionally gzipped")
                .required(true),
        )
        .arg(Arg::new("output").help("Output CSV").required(true))
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("NUMBER")
                .env(THREADS_ENV_VAR)
                .help("Worker threads (default: all available cores)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("max_mismatches")
                .short('k')
                .long("max-mismatches")
                .value_name("K")
                .help("Largest mismatch count to report (default: 5)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("chunk_size")
                .long("chunk-size")
                .value_name("NUMBER")
                .help("Guides searched per batch (default: 1200)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--extended)
                .help("Also write MM0 locations and same/other gene breakdowns")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--progress)
                .help("Show a progress bar on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Give up (and write nothing) if the search takes longer than this")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML config file; its [search] table sets defaults for the flags above"),
        )
}
