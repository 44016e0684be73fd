use clap::{Arg, ArgAction, Command, arg};

pub const SELECT_CMD: &str = "select";

pub fn create_select_cli() -> Command {
    Command::new(SELECT_CMD)
        .author("Databio")
        .about("Filter, deduplicate and rank searched guides, keeping the best N per gene.")
        .arg(
            Arg::new("input")
                .help("Output of `gsift search` with a Score column")
                .required(true),
        )
        .arg(Arg::new("output").help("Output CSV").required(true))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML config file; its [selection] table sets defaults for the flags below"),
        )
        .arg(
            Arg::new("min_score")
                .long("min-score")
                .value_name("SCORE")
                .help("Drop guides scoring below this (default: 0.0)")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("mm1")
                .long("mm1")
                .value_name("COUNT")
                .help("Highest accepted MM1 count (default: 0)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("mm2")
                .long("mm2")
                .value_name("COUNT")
                .help("Highest accepted MM2 count (default: 0)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("mm0_tolerance")
                .long("mm0-tolerance")
                .value_name("COUNT")
                .help("Accepted MM0 above each gene's minimum; 999 disables the stage (default: 0)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(--"no-adaptive-mm0")
                .help("Skip the adaptive MM0 stage")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("top_n")
                .long("top-n")
                .value_name("NUMBER")
                .help("Guides kept per gene (default: 10)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .value_name("FILE")
                .help("Write stage counts and warnings as JSON"),
        )
}
