use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Item table CSV (one row per movie)
    #[arg(value_name = "ITEMS_CSV")]
    pub input: PathBuf,

    /// Where to write the marker table
    #[arg(long, default_value = "markers.csv")]
    pub output: PathBuf,

    /// Path to config TOML (written with defaults if missing)
    #[arg(long, default_value = "dotstrata.toml")]
    pub config: String,

    /// Override the jitter seed from config
    #[arg(long)]
    pub seed: Option<u64>,
}
