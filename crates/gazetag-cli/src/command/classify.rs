use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::Args;
use gazetag_asc::{DEFAULT_SAMPLE_INTERVAL_MS, MarkerConfig, parse_events, read_metadata};
use gazetag_core::{DEFAULT_OFFSET_MS, RegionTable, SampleRecord, classify_trial};

use crate::util::read_json_file;

#[derive(Debug, Clone, Args)]
pub struct ClassifyArg {
    /// Session log files; when empty, every *.asc file in the input
    /// directory is processed
    files: Vec<PathBuf>,
    /// Directory scanned for *.asc files when no files are given
    #[arg(long, default_value = ".")]
    input_dir: PathBuf,
    /// Output file (default: results_YYYYMMDD_HHMMSS.txt)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Overwrite the output file if it already exists
    #[arg(long)]
    force: bool,
    /// Pre-trial inclusion offset in milliseconds
    #[arg(long, default_value_t = DEFAULT_OFFSET_MS)]
    offset_ms: i64,
    /// Sampling interval in milliseconds assumed when a log has no
    /// usable RATE message
    #[arg(long, default_value_t = DEFAULT_SAMPLE_INTERVAL_MS)]
    default_interval_ms: f64,
    /// JSON file overriding the trial marker keywords and field offsets
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file replacing the builtin region table
    #[arg(long)]
    regions: Option<PathBuf>,
}

pub fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let markers: MarkerConfig = match &arg.config {
        Some(path) => read_json_file("marker config", path)?,
        None => MarkerConfig::default(),
    };
    let regions: RegionTable = match &arg.regions {
        Some(path) => read_json_file("region table", path)?,
        None => RegionTable::builtin(),
    };

    let files = discover_inputs(&arg.files, &arg.input_dir)?;
    if files.is_empty() {
        bail!(
            "no .asc session logs found in {}",
            arg.input_dir.display()
        );
    }

    // The sink is only created once at least one input file is known to
    // exist, so an empty run leaves no stray output file behind.
    let output_path = arg.output.clone().unwrap_or_else(default_output_path);
    if output_path.exists() && !arg.force {
        bail!(
            "output file {} already exists (pass --force to overwrite)",
            output_path.display()
        );
    }
    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut sink = BufWriter::new(file);
    writeln!(sink, "{}", SampleRecord::HEADER)
        .with_context(|| format!("Failed to write to {}", output_path.display()))?;

    // File-level errors skip the file; the run continues.
    for path in &files {
        if let Err(err) = process_file(&mut sink, path, &markers, &regions, arg) {
            eprintln!("warning: skipping {}: {err:#}", path.display());
        }
    }

    sink.flush()
        .with_context(|| format!("Failed to flush output to {}", output_path.display()))?;
    eprintln!("done: results written to {}", output_path.display());
    Ok(())
}

/// Explicit file arguments win; otherwise every `*.asc` in `input_dir`,
/// sorted for a deterministic processing order.
fn discover_inputs(files: &[PathBuf], input_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?;
    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "asc") {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "results_{}.txt",
        Utc::now().format("%Y%m%d_%H%M%S")
    ))
}

fn process_file(
    sink: &mut BufWriter<File>,
    path: &Path,
    markers: &MarkerConfig,
    regions: &RegionTable,
    arg: &ClassifyArg,
) -> anyhow::Result<()> {
    let source = path.to_string_lossy();
    eprintln!("processing {source}");

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let metadata = read_metadata(&source, text.lines(), arg.default_interval_ms)?;
    let events = parse_events(text.lines(), markers)?;

    if !events.is_balanced() {
        eprintln!(
            "warning: {source}: {} start but {} end markers; \
             processing the first {} complete trials",
            events.starts.len(),
            events.ends.len(),
            events.trial_count(),
        );
    }
    if events.trial_count() == 0 {
        bail!("no complete trials");
    }
    eprintln!(
        "  {} trials, sample interval {} ms, screen {}x{}",
        events.trial_count(),
        metadata.sample_interval_ms,
        metadata.screen.max_x,
        metadata.screen.max_y,
    );

    for trial in events.trials() {
        let records = classify_trial(
            &source,
            &trial,
            &events.gaze,
            regions,
            metadata.screen,
            arg.offset_ms,
        )?;
        for record in &records {
            writeln!(sink, "{}", record.to_row()).context("Failed to write output row")?;
        }
    }

    Ok(())
}
