use clap::{Parser, Subcommand};

use self::{classify::ClassifyArg, regions::RegionsArg};

mod classify;
mod regions;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Classify gaze samples from session logs into region labels
    Classify(#[clap(flatten)] ClassifyArg),
    /// Dump the effective region table as JSON
    Regions(#[clap(flatten)] RegionsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Classify(arg) => classify::run(&arg)?,
        Mode::Regions(arg) => regions::run(&arg)?,
    }
    Ok(())
}
