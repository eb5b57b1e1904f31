use clap::{Parser, Subcommand};

use crate::cmd::{batch::BatchCommand, calculate::CalculateCommand, schema::SchemaCommand};
use crate::tax::TaxEngine;

mod cmd;
mod core;
mod tax;

#[derive(Debug, Parser)]
#[command(name = "automaks", version, about = "Calculate vehicle registration and annual tax")]
struct Opts {
    /// Calendar year used for vehicle age discounts (defaults to the current year)
    #[arg(long, global = true)]
    current_year: Option<i32>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate taxes for a single vehicle
    Calculate(CalculateCommand),
    /// Calculate taxes for every vehicle in a CSV or JSON file
    Batch(BatchCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let engine = opts.current_year.map_or_else(TaxEngine::today, TaxEngine::new);
    log::debug!("Using current year {}", engine.current_year());

    match opts.cmd {
        Command::Calculate(calculate) => calculate.exec(engine),
        Command::Batch(batch) => batch.exec(engine),
        Command::Schema(schema) => schema.exec(),
    }
}
