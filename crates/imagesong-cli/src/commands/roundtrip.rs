//! Roundtrip command implementation
//!
//! Encodes an image to WAV, then decodes that WAV with one or both methods,
//! writing `<stem>.wav` and `<stem>_<method>.png` into the output directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use imagesong_core::{DecodeMethod, SonifyConfig};

use super::decode::{decode_file, print_summary};
use super::encode::encode_file;

/// Files produced by a roundtrip.
#[derive(Debug)]
pub struct RoundtripOutputs {
    /// The encoded audio.
    pub wav: PathBuf,
    /// One recovered image per method.
    pub images: Vec<(DecodeMethod, PathBuf)>,
}

/// Run the roundtrip command
///
/// # Arguments
/// * `input` - Path to the source image
/// * `out_dir` - Directory for the WAV and PNG outputs (created if missing)
/// * `method` - `spectral`, `demod`, or `None` for both
/// * `config` - Resolved and validated configuration
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    input: &str,
    out_dir: &str,
    method: Option<&str>,
    config: &SonifyConfig,
) -> Result<ExitCode> {
    let methods = match method {
        Some(method) => vec![method.parse::<DecodeMethod>()?],
        None => DecodeMethod::ALL.to_vec(),
    };

    println!("{} {}", "Roundtrip:".cyan().bold(), input);
    let outputs = roundtrip(Path::new(input), Path::new(out_dir), &methods, config)?;

    println!("  {} {}", "Audio:".dimmed(), outputs.wav.display());
    for (method, path) in &outputs.images {
        println!("  {} {}", format!("{}:", method).dimmed(), path.display());
    }
    println!("{}", "Roundtrip complete".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Encodes `input` and decodes the written WAV with each of `methods`.
pub fn roundtrip(
    input: &Path,
    out_dir: &Path,
    methods: &[DecodeMethod],
    config: &SonifyConfig,
) -> Result<RoundtripOutputs> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("imagesong");

    let wav = out_dir.join(format!("{}.wav", stem));
    encode_file(input, &wav, config)?;

    let mut images = Vec::with_capacity(methods.len());
    for &method in methods {
        let png = out_dir.join(format!("{}_{}.png", stem, method));
        let result = decode_file(&wav, &png, method, config)?;
        println!("{} {}", "Decoded with".cyan(), method);
        print_summary(&result, config);
        images.push((method, png));
    }

    Ok(RoundtripOutputs { wav, images })
}
