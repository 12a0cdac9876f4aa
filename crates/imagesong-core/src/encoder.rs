//! Image → waveform encoder.
//!
//! Each image row owns one tone from the [`ToneTable`] and each column owns a
//! slot of the [`TimeGrid`]. Every pixel brighter than the activation
//! threshold adds `amp * sin(2π f (t - offset) + phase)` to the output, with
//! a phase drawn from the seeded generator. The image is flipped first, so
//! the top row of the picture gets the highest tone.

use std::f64::consts::TAU;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustfft::num_complex::Complex;

use crate::config::{SonifyConfig, ToneSpan};
use crate::error::SonifyResult;
use crate::grid::{linspace, TimeGrid, ToneTable};
use crate::image::Image;
use crate::rng::{create_rng, random_phase};
use crate::wav::WavResult;
use crate::waveform::{pcm_hash, Waveform};

/// Result of encoding an image.
#[derive(Debug)]
pub struct EncodeResult {
    /// Peak-normalized float waveform.
    pub waveform: Waveform,
    /// The waveform quantized to PCM16.
    pub pcm: Vec<i16>,
    /// BLAKE3 hash of the PCM16 bytes.
    pub pcm_hash: String,
    /// Number of pixels above the activation threshold.
    pub active_pixels: usize,
}

impl EncodeResult {
    /// Packs the PCM16 samples into a WAV file.
    pub fn to_wav(&self) -> WavResult {
        WavResult::from_pcm16(&self.pcm, self.waveform.sample_rate())
    }
}

/// One active pixel: tone row, amplitude, and its drawn phase.
#[derive(Debug, Clone, Copy)]
struct Tone {
    row: usize,
    amp: f64,
    phase: f64,
}

/// Encodes `image` into a waveform.
///
/// The image's own dimensions drive the synthesis: `image.rows()` tones and
/// `sample_rate * image.cols() / duration_scale` samples. Callers resize to
/// the working grid beforehand.
pub fn encode(image: &Image, config: &SonifyConfig) -> SonifyResult<EncodeResult> {
    config.validate()?;

    let flipped = image.flipped();
    let (rows, cols) = (flipped.rows(), flipped.cols());
    let n_samples = (config.sample_rate as usize * cols) / config.duration_scale as usize;
    let duration = n_samples as f64 / config.sample_rate as f64;

    let tones = ToneTable::new(rows, config.fmin, config.fmax);
    let grid = TimeGrid::new(cols, duration);
    let times = linspace(0.0, duration, n_samples, true);

    log::debug!(
        "encoding {}x{} image: {} samples ({:.3}s), band {}..{} Hz, span {:?}",
        rows,
        cols,
        n_samples,
        duration,
        config.fmin,
        config.fmax,
        config.tone_span
    );

    // Phases are drawn column-major, one per active pixel, before any
    // rendering so the draw order never depends on how rendering is split.
    let mut rng = create_rng(config.seed);
    let columns: Vec<Vec<Tone>> = (0..cols)
        .map(|col| {
            (0..rows)
                .filter_map(|row| {
                    let amp = flipped.get(row, col);
                    (amp > config.activation_threshold).then(|| Tone {
                        row,
                        amp,
                        phase: random_phase(&mut rng),
                    })
                })
                .collect()
        })
        .collect();
    let active_pixels = columns.iter().map(Vec::len).sum();

    let audio = match config.tone_span {
        ToneSpan::Column => render_column_windows(&columns, &tones, &grid, &times),
        ToneSpan::Sustained => render_sustained(&columns, &tones, &grid, &times),
    };

    if active_pixels == 0 {
        log::warn!("no pixel exceeds the activation threshold; output is silent");
    }

    let waveform = Waveform::new(audio, config.sample_rate).peak_normalized();
    let pcm = waveform.to_pcm16();
    let pcm_hash = pcm_hash(&pcm);

    Ok(EncodeResult {
        waveform,
        pcm,
        pcm_hash,
        active_pixels,
    })
}

/// Renders each column's tones into that column's own sample window.
fn render_column_windows(
    columns: &[Vec<Tone>],
    tones: &ToneTable,
    grid: &TimeGrid,
    times: &[f64],
) -> Vec<f64> {
    let n_samples = times.len();
    let mut audio = vec![0.0; n_samples];

    // Windows tile the buffer, so each column gets a disjoint slice.
    let mut slices: Vec<(usize, Range<usize>, &mut [f64])> = Vec::with_capacity(columns.len());
    let mut rest: &mut [f64] = &mut audio;
    for col in 0..columns.len() {
        let window = grid.sample_window(col, n_samples);
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(window.len());
        slices.push((col, window, head));
        rest = tail;
    }

    let render = |(col, window, out): (usize, Range<usize>, &mut [f64])| {
        let offset = grid.offset(col);
        for tone in &columns[col] {
            let omega = TAU * tones.frequency(tone.row);
            for (sample, &t) in out.iter_mut().zip(&times[window.clone()]) {
                *sample += tone.amp * (omega * (t - offset) + tone.phase).sin();
            }
        }
    };

    #[cfg(feature = "parallel")]
    slices.into_par_iter().for_each(render);

    #[cfg(not(feature = "parallel"))]
    slices.into_iter().for_each(render);

    audio
}

/// Renders every tone across the whole buffer.
///
/// Tones on one row share a frequency, so their sum is a single sinusoid:
/// each row's contributions are folded into one phasor
/// `Σ amp · e^{i(phase - ω·offset)}` and rendered once.
fn render_sustained(
    columns: &[Vec<Tone>],
    tones: &ToneTable,
    grid: &TimeGrid,
    times: &[f64],
) -> Vec<f64> {
    let mut phasors = vec![Complex::new(0.0, 0.0); tones.len()];
    for (col, column) in columns.iter().enumerate() {
        let offset = grid.offset(col);
        for tone in column {
            let omega = TAU * tones.frequency(tone.row);
            phasors[tone.row] += Complex::from_polar(tone.amp, tone.phase - omega * offset);
        }
    }

    let mut audio = vec![0.0; times.len()];
    for (row, phasor) in phasors.iter().enumerate() {
        if phasor.norm_sqr() == 0.0 {
            continue;
        }
        let omega = TAU * tones.frequency(row);
        for (sample, &t) in audio.iter_mut().zip(times) {
            let (sin, cos) = (omega * t).sin_cos();
            // Im(phasor · e^{iωt})
            *sample += phasor.re * sin + phasor.im * cos;
        }
    }
    audio
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SonifyConfig {
        SonifyConfig {
            sample_rate: 8000,
            fmin: 400.0,
            fmax: 3200.0,
            duration_scale: 8,
            ..SonifyConfig::default()
        }
        .with_grid(8, 8)
    }

    #[test]
    fn test_length_follows_width() {
        let config = small_config();
        let image = Image::from_fn(8, 8, |_, _| 1.0);
        let result = encode(&image, &config).unwrap();
        assert_eq!(result.waveform.len(), 8000);
        assert_eq!(result.pcm.len(), 8000);
        assert_eq!(result.active_pixels, 64);
    }

    #[test]
    fn test_blank_image_is_silent() {
        let config = small_config();
        let result = encode(&Image::new(8, 8), &config).unwrap();
        assert!(result.waveform.is_silent());
        assert!(result.pcm.iter().all(|&s| s == 0));
        assert_eq!(result.active_pixels, 0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let config = small_config();
        let image = Image::from_fn(8, 8, |_, _| 0.05);
        let result = encode(&image, &config).unwrap();
        assert_eq!(result.active_pixels, 0);
        assert!(result.waveform.is_silent());
    }

    #[test]
    fn test_peak_normalized() {
        let config = small_config();
        let image = Image::from_fn(8, 8, |row, col| ((row + col) % 3) as f64 / 2.0);
        let result = encode(&image, &config).unwrap();
        assert!((result.waveform.peak() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_determinism() {
        let config = small_config().with_seed(42);
        let image = Image::from_fn(8, 8, |row, col| if row == col { 1.0 } else { 0.3 });
        let a = encode(&image, &config).unwrap();
        let b = encode(&image, &config).unwrap();
        assert_eq!(a.pcm_hash, b.pcm_hash);
        assert_eq!(a.waveform, b.waveform);
    }

    #[test]
    fn test_seed_changes_output() {
        let image = Image::from_fn(8, 8, |_, _| 0.8);
        let a = encode(&image, &small_config().with_seed(1)).unwrap();
        let b = encode(&image, &small_config().with_seed(2)).unwrap();
        assert_ne!(a.pcm_hash, b.pcm_hash);
    }

    #[test]
    fn test_column_span_confines_tone() {
        let config = small_config();
        let image = Image::from_fn(8, 8, |row, col| if row == 3 && col == 2 { 1.0 } else { 0.0 });
        let result = encode(&image, &config).unwrap();
        let samples = result.waveform.samples();

        // Column 2 of 8 owns samples 2000..3000.
        assert!(samples[..2000].iter().all(|&s| s == 0.0));
        assert!(samples[3000..].iter().all(|&s| s == 0.0));
        assert!(samples[2000..3000].iter().any(|&s| s.abs() > 0.5));
    }

    #[test]
    fn test_sustained_span_matches_direct_sum() {
        let config = SonifyConfig {
            tone_span: ToneSpan::Sustained,
            ..small_config().with_seed(5)
        };
        let image = Image::from_fn(8, 8, |row, col| if (row * 3 + col) % 5 == 0 { 0.9 } else { 0.0 });
        let result = encode(&image, &config).unwrap();

        // Direct per-pixel sum over the full buffer with the same phase draws.
        let flipped = image.flipped();
        let n = config.audio_length();
        let duration = n as f64 / config.sample_rate as f64;
        let times = linspace(0.0, duration, n, true);
        let tones = ToneTable::new(8, config.fmin, config.fmax);
        let mut rng = create_rng(config.seed);
        let mut expected = vec![0.0; n];
        for col in 0..8 {
            let offset = col as f64 / 8.0 * duration;
            for row in 0..8 {
                let amp = flipped.get(row, col);
                if amp > config.activation_threshold {
                    let phase = random_phase(&mut rng);
                    let f = tones.frequency(row);
                    for (i, &t) in times.iter().enumerate() {
                        expected[i] += amp * (TAU * f * (t - offset) + phase).sin();
                    }
                }
            }
        }
        let expected = Waveform::new(expected, config.sample_rate).peak_normalized();

        for (got, want) in result.waveform.samples().iter().zip(expected.samples()) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_band(3000.0, 1000.0);
        assert!(encode(&Image::new(8, 8), &config).is_err());
    }

    #[test]
    fn test_to_wav() {
        let config = small_config();
        let result = encode(&Image::from_fn(8, 8, |_, _| 1.0), &config).unwrap();
        let wav = result.to_wav();
        assert_eq!(wav.sample_rate, 8000);
        assert_eq!(wav.num_samples, 8000);
        assert_eq!(wav.pcm_hash, result.pcm_hash);
    }
}
