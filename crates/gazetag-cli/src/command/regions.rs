use std::path::PathBuf;

use clap::Args;
use gazetag_core::RegionTable;

use crate::util::{Output, read_json_file};

#[derive(Debug, Clone, Args)]
pub struct RegionsArg {
    /// JSON file replacing the builtin region table
    #[arg(long)]
    regions: Option<PathBuf>,
    /// Write the table to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Dumps the effective region table, mainly for checking a custom table
/// before a classification run.
pub fn run(arg: &RegionsArg) -> anyhow::Result<()> {
    let table: RegionTable = match &arg.regions {
        Some(path) => read_json_file("region table", path)?,
        None => RegionTable::builtin(),
    };

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_json(&table)
}
