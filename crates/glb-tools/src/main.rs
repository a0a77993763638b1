//! glb-inspect: write a structural report for a GLB file.
//!
//! ```text
//! glb-inspect model.glb                  # writes glb_report.txt
//! glb-inspect model.glb -o report.txt
//! glb-inspect model.glb --stdout
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use glb_core::GlbError;
use glb_io::{GlbDocument, ReportMetadata, ReportOptions};
use log::{debug, info};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "glb-inspect")]
#[command(about = "Inspect the structure of a binary glTF (GLB) file")]
#[command(version)]
struct Cli {
    /// Input .glb file
    input: PathBuf,

    /// Report file to write
    #[arg(short, long, default_value = "glb_report.txt")]
    output: PathBuf,

    /// Print the report instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Leave out the scenes, buffer views and buffers sections
    #[arg(long)]
    no_storage: bool,

    /// Fixed number of decimals for accessor min/max values
    #[arg(long)]
    precision: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum ToolError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a .glb file: {0}")]
    NotGlb(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] GlbError),
}

fn has_glb_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("glb"))
}

fn run(cli: &Cli) -> Result<(), ToolError> {
    if !cli.input.is_file() {
        return Err(ToolError::NotFound(cli.input.clone()));
    }
    if !has_glb_extension(&cli.input) {
        return Err(ToolError::NotGlb(cli.input.clone()));
    }

    let document = GlbDocument::open(&cli.input)?;
    debug!(
        "Decoded {}: {} decode diagnostics",
        cli.input.display(),
        document.diagnostics().len()
    );

    let source_name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = ReportMetadata::new(source_name, Local::now().format("%d/%m/%Y %H:%M:%S").to_string())
        .with_path(cli.input.display().to_string());

    let mut options = ReportOptions::new().with_storage_sections(!cli.no_storage);
    if let Some(precision) = cli.precision {
        options = options.with_float_precision(precision);
    }

    let inspection = document.resolve();
    if !inspection.diagnostics.is_empty() {
        info!("{} diagnostics recorded", inspection.diagnostics.len());
    }
    let report = inspection.render(&metadata, &options);

    if cli.stdout {
        print!("{}", report);
        return Ok(());
    }

    fs::write(&cli.output, &report).map_err(|source| ToolError::Write {
        path: cli.output.clone(),
        source,
    })?;
    let shown = fs::canonicalize(&cli.output).unwrap_or_else(|_| cli.output.clone());
    println!("Report saved to: {}", shown.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
