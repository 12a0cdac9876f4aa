//! Spectrogram-magnitude decoder.
//!
//! Computes a short-time Fourier magnitude surface, keeps the bins inside the
//! encoding band, and linearly resamples the surface onto the target grid.
//! Phase is discarded, so adjacent tones closer than one analysis bin blur
//! together.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::config::SonifyConfig;
use crate::decode::{DecodeDetail, DecodeMethod, DecodeResult};
use crate::error::{SonifyError, SonifyResult};
use crate::grid::resample_linear;
use crate::image::AmplitudeGrid;
use crate::waveform::Waveform;

use std::f64::consts::PI;

/// Periodic Hann window of length `n`.
pub fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Bins × frames grid of STFT magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSurface {
    /// Center frequency of each bin, ascending.
    frequencies: Vec<f64>,
    /// Number of analysis frames.
    frames: usize,
    /// Bin-major magnitudes: `data[bin * frames + frame]`.
    data: Vec<f64>,
}

impl MagnitudeSurface {
    /// Wraps precomputed magnitudes.
    pub fn new(frequencies: Vec<f64>, frames: usize, data: Vec<f64>) -> SonifyResult<Self> {
        let expected = frequencies.len() * frames;
        if data.len() != expected {
            return Err(SonifyError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            frequencies,
            frames,
            data,
        })
    }

    /// Computes the centered STFT magnitude of `waveform`.
    ///
    /// The signal is zero-padded by `window / 2` on both sides and analysed
    /// with a periodic Hann window every `hop` samples, giving
    /// `1 + len / hop` frames of `window / 2 + 1` bins for even windows.
    pub fn analyze(waveform: &Waveform, window: usize, hop: usize) -> Self {
        let sample_rate = waveform.sample_rate() as f64;
        let pad = window / 2;
        let mut padded = vec![0.0; pad];
        padded.extend_from_slice(waveform.samples());
        padded.resize(padded.len() + pad, 0.0);

        let frames = if padded.len() >= window {
            1 + (padded.len() - window) / hop
        } else {
            0
        };
        let n_bins = window / 2 + 1;
        let frequencies: Vec<f64> = (0..n_bins)
            .map(|k| k as f64 * sample_rate / window as f64)
            .collect();

        let hann = hann_window(window);
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(window);
        let mut buffer = vec![Complex::new(0.0, 0.0); window];
        let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let mut data = vec![0.0; n_bins * frames];
        for frame in 0..frames {
            let start = frame * hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = Complex::new(padded[start + i] * hann[i], 0.0);
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);
            for (bin, value) in buffer.iter().take(n_bins).enumerate() {
                data[bin * frames + frame] = value.norm();
            }
        }

        Self {
            frequencies,
            frames,
            data,
        }
    }

    /// Number of frequency bins.
    pub fn bins(&self) -> usize {
        self.frequencies.len()
    }

    /// Number of analysis frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Center frequency of each bin.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Magnitude at `(bin, frame)`.
    #[inline]
    pub fn get(&self, bin: usize, frame: usize) -> f64 {
        self.data[bin * self.frames + frame]
    }

    /// Keeps only bins whose center frequency lies in `[fmin, fmax]`.
    pub fn band(&self, fmin: f64, fmax: f64) -> SonifyResult<Self> {
        let keep: Vec<usize> = self
            .frequencies
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f >= fmin && f <= fmax)
            .map(|(bin, _)| bin)
            .collect();
        if keep.is_empty() {
            return Err(SonifyError::EmptyBand { fmin, fmax });
        }

        let mut data = Vec::with_capacity(keep.len() * self.frames);
        for &bin in &keep {
            data.extend_from_slice(&self.data[bin * self.frames..(bin + 1) * self.frames]);
        }
        Ok(Self {
            frequencies: keep.iter().map(|&bin| self.frequencies[bin]).collect(),
            frames: self.frames,
            data,
        })
    }

    /// Resamples onto an `n_rows × n_cols` grid.
    ///
    /// Each frame is first interpolated along the bin axis to `n_rows`
    /// values, then each resulting row along the frame axis to `n_cols`
    /// values. Axes that already match are copied through unchanged.
    pub fn resample(&self, n_rows: usize, n_cols: usize) -> AmplitudeGrid {
        let bins = self.bins();

        // Frequency axis, per frame: rows × frames.
        let mut by_row = vec![0.0; n_rows * self.frames];
        let mut column = vec![0.0; bins];
        for frame in 0..self.frames {
            for (bin, value) in column.iter_mut().enumerate() {
                *value = self.get(bin, frame);
            }
            for (row, value) in resample_linear(&column, n_rows).into_iter().enumerate() {
                by_row[row * self.frames + frame] = value;
            }
        }

        // Time axis, per row: rows × cols.
        let mut grid = AmplitudeGrid::zeros(n_rows, n_cols);
        for row in 0..n_rows {
            let series = &by_row[row * self.frames..(row + 1) * self.frames];
            for (col, value) in resample_linear(series, n_cols).into_iter().enumerate() {
                grid.set(row, col, value);
            }
        }
        grid
    }
}

/// Recovers an image from the STFT magnitude of `waveform`.
///
/// The waveform's own sample rate is used for bin frequencies; grid size,
/// band and analysis sizes come from `config`.
pub fn decode_spectral(waveform: &Waveform, config: &SonifyConfig) -> SonifyResult<DecodeResult> {
    config.validate()?;
    if waveform.sample_rate() == 0 {
        return Err(SonifyError::invalid_param("sample_rate", "waveform has a zero sample rate"));
    }

    let surface = MagnitudeSurface::analyze(waveform, config.analysis_window, config.analysis_hop);
    let band = surface.band(config.fmin, config.fmax)?;

    log::debug!(
        "spectral decode: {} frames, {} of {} bins in band, resampling to {}x{}",
        band.frames(),
        band.bins(),
        surface.bins(),
        config.rows,
        config.cols
    );
    if band.bins() < config.rows {
        log::debug!(
            "band has fewer bins ({}) than rows ({}); adjacent rows will blur",
            band.bins(),
            config.rows
        );
    }

    let amplitudes = band.resample(config.rows, config.cols);
    let image = amplitudes.clone().into_recovered();

    Ok(DecodeResult {
        method: DecodeMethod::Spectral,
        image,
        amplitudes,
        detail: DecodeDetail::Spectral {
            frames: band.frames(),
            band_bins: band.bins(),
        },
    })
}
