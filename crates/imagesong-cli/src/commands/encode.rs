//! Encode command implementation
//!
//! Loads a raster image, sonifies it, and writes a mono PCM16 WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use imagesong_core::{encode, EncodeResult, SonifyConfig};

use crate::input::load_image;

/// Run the encode command
///
/// # Arguments
/// * `input` - Path to the source image
/// * `output` - Path of the WAV file to write
/// * `config` - Resolved and validated configuration
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(input: &str, output: &str, config: &SonifyConfig) -> Result<ExitCode> {
    println!("{} {}", "Encoding:".cyan().bold(), input);

    let result = encode_file(Path::new(input), Path::new(output), config)?;

    print_summary(&result, config);
    println!("{} {}", "Wrote".green().bold(), output);
    Ok(ExitCode::SUCCESS)
}

/// Loads `input`, encodes it, and writes the WAV to `output`.
pub fn encode_file(input: &Path, output: &Path, config: &SonifyConfig) -> Result<EncodeResult> {
    let image = load_image(input, config.rows, config.cols)?;
    let result = encode(&image, config)
        .with_context(|| format!("Failed to encode image: {}", input.display()))?;

    let wav = result.to_wav();
    std::fs::write(output, &wav.wav_data)
        .with_context(|| format!("Failed to write WAV file: {}", output.display()))?;
    log::info!("wrote {} bytes to {}", wav.wav_data.len(), output.display());

    Ok(result)
}

fn print_summary(result: &EncodeResult, config: &SonifyConfig) {
    println!("  {} {}x{}", "Grid:".dimmed(), config.rows, config.cols);
    println!(
        "  {} {} - {} Hz",
        "Band:".dimmed(),
        config.fmin,
        config.fmax
    );
    println!(
        "  {} {} samples @ {} Hz ({:.3}s)",
        "Audio:".dimmed(),
        result.waveform.len(),
        result.waveform.sample_rate(),
        result.waveform.duration_seconds()
    );
    println!("  {} {}", "Active pixels:".dimmed(), result.active_pixels);
    println!("  {} {}", "PCM hash:".dimmed(), result.pcm_hash);
    if result.active_pixels == 0 {
        println!(
            "  {} no pixel exceeds the activation threshold; output is silent",
            "warning:".yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_file_writes_wav() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("source.png");
        let output = dir.path().join("song.wav");
        image::GrayImage::from_fn(16, 16, |x, y| image::Luma([((x + y) * 8) as u8]))
            .save(&input)
            .unwrap();

        let config = SonifyConfig {
            sample_rate: 8000,
            fmin: 400.0,
            fmax: 3200.0,
            duration_scale: 16,
            ..SonifyConfig::default()
        }
        .with_grid(8, 8);

        let result = encode_file(&input, &output, &config).unwrap();
        assert_eq!(result.waveform.len(), 4000);

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 4000 * 2);
    }

    #[test]
    fn test_encode_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_file(
            &dir.path().join("absent.png"),
            &dir.path().join("out.wav"),
            &SonifyConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("input not found"));
        assert!(!dir.path().join("out.wav").exists());
    }
}
