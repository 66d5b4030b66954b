//! # Steg Binary Entry Point
//!
//! Command-line front end for hiding images in WAV files.
//!
//! ## Usage
//!
//! ```bash
//! # Hide an image
//! steg hide audio.wav secret.png output.wav
//!
//! # Extract an image
//! steg extract stego.wav recovered.png
//!
//! # Check audio capacity
//! steg capacity audio.wav
//!
//! # Resize image to fit
//! steg resize -a audio.wav large.jpg resized.png
//!
//! # Compare images
//! steg compare original.png extracted.png
//! ```
//!
//! Exit codes: `0` on success, `1` on any error, `130` when interrupted.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use audio_steg::common::config::StegConfig;
use audio_steg::steganography::{
    self, CompareReport, ExtractReport, HideReport, ResizeBudget, ResizeReport,
};
use audio_steg::processing::CapacityReport;
use audio_steg::utils::logging::init_logger;

const RULE: &str = "======================================================================";

/// Audio Steganography - Hide images in WAV files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Suppress progress output and the final summary
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the operation report as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide an image in a WAV file
    Hide {
        /// Input WAV file
        audio: PathBuf,
        /// Image to hide
        image: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Automatically resize image if too large
        #[arg(short = 'r', long)]
        auto_resize: bool,
    },
    /// Extract an image from a WAV file
    Extract {
        /// WAV file with hidden image
        audio: PathBuf,
        /// Output image file (use a lossless format such as PNG)
        output: PathBuf,
    },
    /// Resize image to fit audio capacity
    Resize {
        /// Input image
        image: PathBuf,
        /// Output resized image
        output: PathBuf,
        /// WAV file to check capacity
        #[arg(short, long, required_unless_present = "max_bytes", conflicts_with = "max_bytes")]
        audio: Option<PathBuf>,
        /// Maximum bytes (alternative to --audio)
        #[arg(short = 'b', long)]
        max_bytes: Option<i64>,
    },
    /// Check audio file capacity
    Capacity {
        /// WAV file to analyze
        audio: PathBuf,
    },
    /// Compare two images
    Compare {
        /// First image
        image1: PathBuf,
        /// Second image
        image2: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<StegConfig> {
    match &args.config {
        Some(path) => StegConfig::from_file(path),
        None => Ok(StegConfig::default()),
    }
}

fn print_json<T: serde::Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_hide(report: &HideReport) {
    if let Some(fit) = report.fit.as_ref().filter(|fit| fit.resized) {
        println!(
            "Image auto-resized from {}x{} to {}x{}",
            fit.original_dims.0, fit.original_dims.1, fit.final_dims.0, fit.final_dims.1
        );
    }
    println!(
        "\nSuccess! Capacity used: {:.2}%",
        report.capacity_usage
    );
}

fn print_extract(report: &ExtractReport) {
    println!(
        "\nSuccess! Extracted {}x{} image",
        report.image_size.0, report.image_size.1
    );
    if let Some(mismatch) = report.size_mismatch {
        println!(
            "Warning: header declared {} bytes, expected {}",
            mismatch.declared, mismatch.expected
        );
    }
}

fn print_resize(report: &ResizeReport) {
    let fit = &report.fit;
    if fit.resized {
        println!(
            "\nResized from {}x{} to {}x{}",
            fit.original_dims.0, fit.original_dims.1, fit.final_dims.0, fit.final_dims.1
        );
    } else {
        println!("\nImage already fits, copied to output");
    }
}

fn print_capacity(audio: &std::path::Path, report: &CapacityReport) {
    println!("\n{}", RULE);
    println!("Audio Capacity Information: {}", audio.display());
    println!("{}", RULE);
    println!("Duration:      {:.2} seconds", report.duration_seconds);
    println!("Sample Rate:   {} Hz", report.sample_rate);
    println!("Channels:      {}", report.channels);
    println!("Sample Width:  {} bytes", report.sample_width);
    println!("Total Samples: {}", report.total_samples);
    println!("\nSteganography Capacity:");
    println!("  {} bytes", report.capacity_bytes);
    println!("  {:.2} KB", report.capacity_kb);
    println!("  {:.2} MB", report.capacity_mb());
    println!("{}\n", RULE);
}

fn print_compare(report: &CompareReport) {
    let result = &report.result;
    println!();
    if result.identical {
        println!("Images are identical!");
    } else if let Some(reason) = &result.reason {
        println!("Images differ: {}", reason);
        println!("Similarity: {:.2}%", result.similarity);
    } else {
        println!("Similarity: {:.2}%", result.similarity);
        if let (Some(different), Some(total)) = (result.different_pixels, result.total_pixels) {
            println!("Different pixels: {} out of {}", different, total);
        }
    }
}

fn run(args: Args, config: StegConfig) -> Result<()> {
    let codec = config.codec();
    let summary = !args.quiet && !args.json;

    match args.command {
        Command::Hide {
            audio,
            image,
            output,
            auto_resize,
        } => {
            let codec = codec.with_auto_fit(auto_resize || config.embed.auto_fit);
            let report = steganography::hide_image(&audio, &image, &output, &codec)?;
            if args.json {
                print_json(&report)?;
            } else if summary {
                print_hide(&report);
            }
        }
        Command::Extract { audio, output } => {
            let report = steganography::extract_image(&audio, &output, &codec)?;
            if args.json {
                print_json(&report)?;
            } else if summary {
                print_extract(&report);
            }
        }
        Command::Resize {
            image,
            output,
            audio,
            max_bytes,
        } => {
            let budget = match (audio, max_bytes) {
                (Some(audio), _) => ResizeBudget::Audio(audio),
                (None, Some(max_bytes)) => ResizeBudget::Bytes(max_bytes),
                (None, None) => bail!("either --audio or --max-bytes must be provided"),
            };
            let report =
                steganography::resize_image_for_audio(&image, &output, &budget, codec.filter)?;
            if args.json {
                print_json(&report)?;
            } else if summary {
                print_resize(&report);
            }
        }
        Command::Capacity { audio } => {
            let report = steganography::audio_capacity(&audio)?;
            if args.json {
                print_json(&report)?;
            } else {
                print_capacity(&audio, &report);
            }
        }
        Command::Compare { image1, image2 } => {
            let report = steganography::compare_images(&image1, &image2)?;
            if args.json {
                print_json(&report)?;
            } else {
                print_compare(&report);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if args.quiet {
        LevelFilter::Warn
    } else {
        match config.logging.level_filter() {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    // Initialize logging
    init_logger(level);

    // codec work is blocking
    let task = tokio::task::spawn_blocking(move || run(args, config));

    tokio::select! {
        joined = task => match joined {
            Ok(Ok(())) => ExitCode::SUCCESS,
            Ok(Err(e)) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n\nInterrupted by user");
            // the blocking task cannot be cancelled; leave without waiting for it
            std::process::exit(130);
        }
    }
}
