//! Decode command implementation
//!
//! Reads a WAV file, recovers the image with the chosen method, and writes
//! an 8-bit grayscale PNG.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use imagesong_core::png::{write_recovered, PngConfig};
use imagesong_core::wav::read_wav_file;
use imagesong_core::{decode, DecodeDetail, DecodeMethod, DecodeResult, SonifyConfig};

/// Run the decode command
///
/// # Arguments
/// * `input` - Path to the WAV file
/// * `output` - Path of the PNG file to write
/// * `method` - `spectral` or `demod`
/// * `config` - Resolved and validated configuration
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &str, output: &str, method: &str, config: &SonifyConfig) -> Result<ExitCode> {
    let method: DecodeMethod = method.parse()?;
    println!(
        "{} {} ({})",
        "Decoding:".cyan().bold(),
        input,
        method
    );

    let result = decode_file(Path::new(input), Path::new(output), method, config)?;

    print_summary(&result, config);
    println!("{} {}", "Wrote".green().bold(), output);
    Ok(ExitCode::SUCCESS)
}

/// Reads `input`, decodes it with `method`, and writes the PNG to `output`.
pub fn decode_file(
    input: &Path,
    output: &Path,
    method: DecodeMethod,
    config: &SonifyConfig,
) -> Result<DecodeResult> {
    let waveform = read_wav_file(input, method.pcm_scaling())
        .with_context(|| format!("Failed to read WAV file: {}", input.display()))?;
    log::info!(
        "loaded {} samples @ {} Hz from {}",
        waveform.len(),
        waveform.sample_rate(),
        input.display()
    );
    if waveform.sample_rate() != config.sample_rate {
        log::warn!(
            "file sample rate {} Hz differs from configured {} Hz; using the file's",
            waveform.sample_rate(),
            config.sample_rate
        );
    }

    let result = decode(&waveform, config, method)
        .with_context(|| format!("Failed to decode {} with {}", input.display(), method))?;

    write_recovered(&result.image, output, &PngConfig::default())
        .with_context(|| format!("Failed to write PNG file: {}", output.display()))?;

    Ok(result)
}

pub(crate) fn print_summary(result: &DecodeResult, config: &SonifyConfig) {
    println!(
        "  {} {}x{}",
        "Grid:".dimmed(),
        result.image.rows(),
        result.image.cols()
    );
    match result.detail {
        DecodeDetail::Spectral { frames, band_bins } => {
            println!("  {} {}", "Frames:".dimmed(), frames);
            println!("  {} {}", "Band bins:".dimmed(), band_bins);
        }
        DecodeDetail::Demod {
            column_samples,
            columns_decoded,
        } => {
            println!("  {} {}", "Column samples:".dimmed(), column_samples);
            println!(
                "  {} {}/{}",
                "Columns decoded:".dimmed(),
                columns_decoded,
                config.cols
            );
            if columns_decoded < config.cols {
                println!(
                    "  {} trailing columns start past the end of the audio and stay black",
                    "warning:".yellow().bold()
                );
            }
        }
    }
}
