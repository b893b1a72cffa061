//! framegrid CLI - a minimal host that drives the registered nodes by name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Axis;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use framegrid::ops;
use framegrid::registry::InputKind;
use framegrid::{Config, ImageBatch, Registry, SequenceFormat, Value};

/// Split images into grids and move frame sequences in and out of folders.
#[derive(Parser, Debug)]
#[command(name = "framegrid")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base output directory for relative folder names.
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Save sequences as JPEG with this quality (1-100) instead of PNG.
    #[arg(long, global = true, value_name = "INT")]
    jpeg_quality: Option<u8>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every registered node with its inputs and outputs.
    Nodes,

    /// Split an image into a grid and save the tiles as a sequence.
    Split {
        /// Input image path.
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Destination folder for the tiles.
        #[arg(long, default_value = "tiles", value_name = "FOLDER")]
        folder: String,

        #[arg(long, default_value = "2", value_name = "INT")]
        rows: i64,

        #[arg(long, default_value = "3", value_name = "INT")]
        cols: i64,
    },

    /// Load a tile sequence and merge it back into one image.
    Merge {
        /// Folder holding the tiles.
        #[arg(value_name = "FOLDER")]
        folder: String,

        /// Output image path.
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[arg(long, default_value = "2", value_name = "INT")]
        rows: i64,

        #[arg(long, default_value = "3", value_name = "INT")]
        cols: i64,
    },

    /// Copy a sequence frame by frame, as a queue-driven workflow would.
    Extract {
        /// Source sequence folder.
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Destination sequence folder.
        #[arg(value_name = "DEST")]
        dest: String,

        /// First frame to copy.
        #[arg(long, default_value = "0", value_name = "INT")]
        start: i64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("framegrid={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    let mut config = args
        .output_dir
        .as_ref()
        .map_or_else(Config::default, Config::with_output_dir);
    if let Some(quality) = args.jpeg_quality {
        config.format = SequenceFormat::Jpeg { quality };
    }
    config.validate().context("Invalid configuration")?;

    let registry = Registry::load().context("Failed to load node registry")?;

    match &args.command {
        Command::Nodes => {
            print_nodes(&registry);
            Ok(())
        }
        Command::Split {
            input,
            folder,
            rows,
            cols,
        } => split(&registry, &config, input, folder, *rows, *cols),
        Command::Merge {
            folder,
            output,
            rows,
            cols,
        } => merge(&registry, &config, folder, output, *rows, *cols),
        Command::Extract {
            source,
            dest,
            start,
        } => extract(&registry, &config, source, dest, *start),
    }
}

fn print_nodes(registry: &Registry) {
    for spec in registry.iter() {
        let marker = if spec.output_node { " [output]" } else { "" };
        println!(
            "{} ({}) - {}{marker}",
            spec.name, spec.display_name, spec.category
        );
        for input in spec.inputs {
            let detail = match input.kind {
                InputKind::Image => String::new(),
                InputKind::Int {
                    default,
                    min,
                    max,
                    step,
                    control_after_generate,
                } => {
                    let auto = if control_after_generate { ", auto-increment" } else { "" };
                    format!(" default={default} range={min}..={max} step={step}{auto}")
                }
                InputKind::String { default } => format!(" default={default:?}"),
            };
            println!("  in  {}: {}{detail}", input.name, input.kind.value_kind().name());
        }
        for output in spec.outputs {
            println!("  out {}: {}", output.name, output.kind.name());
        }
    }
}

fn split(
    registry: &Registry,
    config: &Config,
    input: &Path,
    folder: &str,
    rows: i64,
    cols: i64,
) -> Result<()> {
    let image = framegrid::image::load_image(input)
        .with_context(|| format!("Failed to load {}", input.display()))?
        .insert_axis(Axis(0));

    let outputs = registry.invoke(
        "ImageGridSplit",
        config,
        named([
            ("image", Value::Image(image)),
            ("rows", Value::Int(rows)),
            ("cols", Value::Int(cols)),
        ]),
    )?;
    let tiles = image_output(outputs, 0)?;
    let tile_count = tiles.len_of(Axis(0));

    let outputs = registry.invoke(
        "SaveImageSequence",
        config,
        named([
            ("images", Value::Image(tiles)),
            ("folder_name", Value::String(folder.to_string())),
            ("frame_index", Value::Int(0)),
        ]),
    )?;

    println!(
        "Saved {tile_count} tiles to {}",
        string_output(&outputs, 0)?
    );
    Ok(())
}

fn merge(
    registry: &Registry,
    config: &Config,
    folder: &str,
    output: &Path,
    rows: i64,
    cols: i64,
) -> Result<()> {
    let outputs = registry.invoke(
        "LoadImageSequence",
        config,
        named([("folder_path", Value::String(folder.to_string()))]),
    )?;
    let tiles = image_output(outputs, 0)?;

    let outputs = registry.invoke(
        "ImageGridMerge",
        config,
        named([
            ("tiles", Value::Image(tiles)),
            ("rows", Value::Int(rows)),
            ("cols", Value::Int(cols)),
        ]),
    )?;
    let image = image_output(outputs, 0)?;

    let format = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            SequenceFormat::Jpeg {
                quality: jpeg_quality(config),
            }
        }
        _ => SequenceFormat::Png,
    };
    framegrid::image::save_image(image.index_axis(Axis(0), 0), output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Merged {} -> {}", folder, output.display());
    Ok(())
}

/// Select and save one frame per run the way a host queue does, feeding
/// `next_frame_index` back in until the source is exhausted.
///
/// Frames are selected from the loaded batch directly: `Registry::invoke`
/// takes inputs by value, so going through `FrameSelector` would copy the
/// whole video on every step.
fn extract(
    registry: &Registry,
    config: &Config,
    source: &str,
    dest: &str,
    start: i64,
) -> Result<()> {
    let outputs = registry.invoke(
        "LoadImageSequence",
        config,
        named([("folder_path", Value::String(source.to_string()))]),
    )?;
    let total = int_output(&outputs, 1)?;
    let video = image_output(outputs, 0)?;

    let remaining = u64::try_from(total - start).unwrap_or(0);
    let pb = ProgressBar::new(remaining);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Extracting [{bar:40.cyan/blue}] {pos}/{len}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    let mut frame_index = start;
    while frame_index < total {
        let index = usize::try_from(frame_index).context("Negative frame index")?;
        let frame = ops::select_frame(&video, index)?.frame;

        let outputs = registry.invoke(
            "SaveImageSequence",
            config,
            named([
                ("images", Value::Image(frame)),
                ("folder_name", Value::String(dest.to_string())),
                ("frame_index", Value::Int(frame_index)),
            ]),
        )?;
        frame_index = int_output(&outputs, 1)?;

        pb.inc(1);
    }

    pb.finish_with_message("Extraction complete");
    println!("Copied {remaining} frames from {source} to {dest}");
    Ok(())
}

fn jpeg_quality(config: &Config) -> u8 {
    match config.format {
        SequenceFormat::Jpeg { quality } => quality,
        SequenceFormat::Png => framegrid::image::DEFAULT_JPEG_QUALITY,
    }
}

fn named<const N: usize>(values: [(&str, Value); N]) -> HashMap<String, Value> {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn image_output(outputs: Vec<Value>, index: usize) -> Result<ImageBatch> {
    outputs
        .into_iter()
        .nth(index)
        .and_then(Value::into_image)
        .with_context(|| format!("Expected an image at output {index}"))
}

fn int_output(outputs: &[Value], index: usize) -> Result<i64> {
    outputs
        .get(index)
        .and_then(Value::as_int)
        .with_context(|| format!("Expected an integer at output {index}"))
}

fn string_output(outputs: &[Value], index: usize) -> Result<&str> {
    outputs
        .get(index)
        .and_then(Value::as_str)
        .with_context(|| format!("Expected a string at output {index}"))
}
