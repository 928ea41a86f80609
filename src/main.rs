// Entry point: headless batch run over every configured axis pair.

use std::error::Error;

use clap::Parser;
use tracing::info;

use dotstrata::cli::Args;
use dotstrata::config::SimConfig;
use dotstrata::data::table::ItemTable;
use dotstrata::output;
use dotstrata::sim::runner::run_all_pairs;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut cfg = SimConfig::load_or_default(&args.config);
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    info!(
        pairs = cfg.pairs.len(),
        zoom_levels = cfg.zoom_levels,
        seed = cfg.seed,
        "starting run"
    );

    let table = ItemTable::from_csv_path(&args.input)?;
    let rows = run_all_pairs(&table, &cfg)?;
    output::write_rows(&args.output, &rows)?;
    Ok(())
}
