//! ImageSong CLI - turn images into audio and recover them again
//!
//! This binary encodes raster images into WAV files whose spectrogram draws
//! the image, and decodes such WAV files back into grayscale PNGs.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use imagesong_cli::commands;
use imagesong_cli::input::{resolve_config, ConfigOverrides};

/// ImageSong - Image Sonification and Recovery
#[derive(Parser)]
#[command(name = "imagesong")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Configuration file and per-flag overrides shared by every command.
#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Path to a JSON config file (missing fields take defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Frequency of the bottom image row in Hz
    #[arg(long)]
    fmin: Option<f64>,

    /// Frequency of the top image row in Hz
    #[arg(long)]
    fmax: Option<f64>,

    /// Working grid height
    #[arg(long)]
    rows: Option<usize>,

    /// Working grid width
    #[arg(long)]
    cols: Option<usize>,

    /// Phase generator seed
    #[arg(long)]
    seed: Option<u32>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            sample_rate: self.sample_rate,
            fmin: self.fmin,
            fmax: self.fmax,
            rows: self.rows,
            cols: self.cols,
            seed: self.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image into a WAV file
    Encode {
        /// Path to the source image
        #[arg(short, long)]
        input: String,

        /// Path of the WAV file to write
        #[arg(short, long)]
        output: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Recover an image from a WAV file
    Decode {
        /// Path to the WAV file
        #[arg(short, long)]
        input: String,

        /// Path of the PNG file to write
        #[arg(short, long)]
        output: String,

        /// Recovery method
        #[arg(short, long, default_value = "demod", value_parser = ["spectral", "demod"])]
        method: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Encode an image, then decode the result with one or both methods
    Roundtrip {
        /// Path to the source image
        #[arg(short, long)]
        input: String,

        /// Output directory for the WAV and PNG files
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Only decode with this method (default: both)
        #[arg(short, long, value_parser = ["spectral", "demod"])]
        method: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode {
            input,
            output,
            config,
        } => resolve_config(config.config.as_deref(), &config.overrides())
            .and_then(|config| commands::encode::run(&input, &output, &config)),
        Commands::Decode {
            input,
            output,
            method,
            config,
        } => resolve_config(config.config.as_deref(), &config.overrides())
            .and_then(|config| commands::decode::run(&input, &output, &method, &config)),
        Commands::Roundtrip {
            input,
            out_dir,
            method,
            config,
        } => resolve_config(config.config.as_deref(), &config.overrides()).and_then(|config| {
            commands::roundtrip::run(&input, &out_dir, method.as_deref(), &config)
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
