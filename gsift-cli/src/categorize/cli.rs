use clap::{Arg, Command};

pub const CATEGORIZE_CMD: &str = "categorize";

pub fn create_categorize_cli() -> Command {
    Command::new(CATEGORIZE_CMD)
        .author("Databio")
        .about("Classify the perfect matches of each guide as same-gene only or hitting other genes.")
        .arg(
            Arg::new("input")
                .help("Output of `gsift search --extended`")
                .required(true),
        )
        .arg(Arg::new("output").help("Output CSV").required(true))
        .arg(
            Arg::new("summary")
                .long("summary")
                .value_name("FILE")
                .help("Write category totals as JSON"),
        )
}
