//! PDF Reorder desktop tool
//!
//! Launches the thumbnail grid window, or merges PDFs headlessly with the
//! `merge` subcommand.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use eframe::egui;
use glob::glob;
use std::path::PathBuf;
use std::process;

use pdf_reorder::app::{AppConfig, MergerApp, WINDOW_TITLE};
use pdf_reorder::naming::{auto_output_name, normalize_output_name};
use pdf_reorder::pdf::{merge_pdfs, MergeOptions};
use pdf_reorder::Error;

/// PDF Reorder - Arrange PDFs as thumbnails and merge them in order
#[derive(Parser)]
#[command(name = "pdf-reorder")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "EXAMPLES:
    # Open the window with two PDFs already on the board
    pdf-reorder intro.pdf advanced.pdf

    # Merge without the window, in the order given
    pdf-reorder merge -o handout.pdf intro.pdf \"chapter-*.pdf\"

    # Merge into the next free Merged_Output file and open it
    pdf-reorder merge --auto-name --open *.pdf")]
struct Cli {
    /// PDF files to place on the board at startup
    files: Vec<PathBuf>,

    /// Thumbnails per grid row
    #[arg(long, default_value_t = 3)]
    columns: usize,

    /// Directory that relative output names resolve against (default: current directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory containing the pdfium library, tried before the system library
    #[arg(long)]
    pdfium_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge PDF files into one, in the order given
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path (".pdf" is appended if missing)
        #[arg(short, long, conflicts_with = "auto_name")]
        output: Option<PathBuf>,

        /// Write to the first free Merged_Output name in the current directory
        #[arg(long)]
        auto_name: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Merge { inputs, output, auto_name, open }) => {
            cmd_merge(inputs, output, auto_name, open)
        }
        None => run_gui(cli.files, cli.columns, cli.output_dir, cli.pdfium_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
///
/// The order of the arguments is the merge order, so only the matches of a
/// single pattern are sorted.
fn expand_globs(patterns: Vec<String>) -> pdf_reorder::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries =
                glob(&pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;
            let mut matched: Vec<PathBuf> = Vec::new();
            for entry in entries {
                match entry {
                    Ok(path) => matched.push(path),
                    Err(e) => log::warn!("glob error for {}: {}", pattern, e),
                }
            }
            if matched.is_empty() {
                return Err(Error::NoFilesMatched(pattern));
            }
            matched.sort();
            paths.extend(matched);
        } else {
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// Merge PDFs into one without opening the window
fn cmd_merge(
    inputs: Vec<String>,
    output: Option<PathBuf>,
    auto_name: bool,
    open: bool,
) -> anyhow::Result<()> {
    let inputs = expand_globs(inputs)?;

    let output = match (output, auto_name) {
        (Some(path), _) => PathBuf::from(normalize_output_name(&path.to_string_lossy())),
        (None, true) => {
            let dir = std::env::current_dir().context("Cannot read the current directory")?;
            dir.join(auto_output_name(&dir))
        }
        (None, false) => bail!("either --output or --auto-name is required"),
    };

    eprintln!("Merging {} PDF files...", inputs.len());

    let options = MergeOptions {
        input_paths: inputs,
        output_path: output.clone(),
    };
    let summary = merge_pdfs(&options)?;

    eprintln!("Merged {} pages to: {}", summary.page_count, output.display());

    if open {
        open::that_detached(&output)
            .with_context(|| format!("Cannot open {}", output.display()))?;
    }

    Ok(())
}

/// Open the thumbnail grid window
fn run_gui(
    files: Vec<PathBuf>,
    columns: usize,
    output_dir: Option<PathBuf>,
    pdfium_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot read the current directory")?,
    };

    let config = AppConfig {
        columns,
        output_dir,
        pdfium_dir,
        initial_files: files,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(MergerApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {}", e))
}
