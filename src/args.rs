use clap::Parser;
use std::path::PathBuf;

/// Ranks farmers and summarizes crop submissions exported from the farmer data store.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The exported submissions, as CSV or as a JSON array of rows.
    #[clap(short, long, value_parser, default_value = "farmer_data.csv")]
    pub input: PathBuf,

    /// (csv or json) The input format. Guessed from the file extension when not given.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (directory) Where the leaderboard, distributions and summary are written.
    #[clap(short, long, value_parser, default_value = ".")]
    pub out_dir: PathBuf,

    /// Restrict the dashboard to one province ("All" for every province).
    #[clap(long, value_parser)]
    pub province: Option<String>,

    /// Restrict the dashboard to one district of the province.
    #[clap(long, value_parser)]
    pub district: Option<String>,

    /// Restrict the dashboard to one crop.
    #[clap(long, value_parser)]
    pub crop: Option<String>,

    /// A farmer id whose leaderboard position should be reported.
    #[clap(short, long, value_parser)]
    pub farmer: Option<String>,

    /// Number of rows shown in each console preview.
    #[clap(long, value_parser, default_value_t = 10)]
    pub preview_rows: usize,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
