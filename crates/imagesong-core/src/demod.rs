//! Quadrature (matched-filter) demodulation decoder.
//!
//! The waveform is cut into one chunk per image column. Each chunk is
//! projected onto a sine and a cosine at every tone frequency; the norm of
//! the two projections is the tone's amplitude in that column regardless of
//! the encoder's random phase.
//!
//! Chunk length is `round(column_duration * sample_rate)`. When that rounding
//! goes up, chunk starts drift past the nominal column boundaries and the
//! last columns can begin beyond the end of the signal. Those columns are
//! left at zero; the drift is not corrected.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SonifyConfig;
use crate::decode::{DecodeDetail, DecodeMethod, DecodeResult};
use crate::error::{SonifyError, SonifyResult};
use crate::grid::{linspace, ToneTable};
use crate::image::AmplitudeGrid;
use crate::waveform::Waveform;

use std::f64::consts::TAU;

/// Sine and cosine references for every tone row over one chunk.
#[derive(Debug, Clone)]
pub struct ReferenceBank {
    column_samples: usize,
    sin: Vec<Vec<f64>>,
    cos: Vec<Vec<f64>>,
}

impl ReferenceBank {
    /// Samples each tone at `column_samples` points spread over
    /// `[0, column_duration)`.
    pub fn new(tones: &ToneTable, column_duration: f64, column_samples: usize) -> Self {
        let t = linspace(0.0, column_duration, column_samples, false);
        let (sin, cos): (Vec<Vec<f64>>, Vec<Vec<f64>>) = tones
            .frequencies()
            .iter()
            .map(|&freq| t.iter().map(|&time| (TAU * freq * time).sin_cos()).unzip())
            .unzip();
        Self {
            column_samples,
            sin,
            cos,
        }
    }

    /// Samples per chunk.
    pub fn column_samples(&self) -> usize {
        self.column_samples
    }

    /// Number of tone rows.
    pub fn rows(&self) -> usize {
        self.sin.len()
    }

    /// Amplitude of every tone row in `chunk`.
    ///
    /// `chunk` must be exactly `column_samples` long.
    pub fn project(&self, chunk: &[f64]) -> Vec<f64> {
        self.sin
            .iter()
            .zip(&self.cos)
            .map(|(sin, cos)| {
                let q = dot(chunk, sin);
                let i = dot(chunk, cos);
                (i * i + q * q).sqrt()
            })
            .collect()
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Samples per column chunk: `round(duration / n_cols * sample_rate)`.
///
/// Ties round to even.
pub fn column_samples(total_samples: usize, sample_rate: u32, n_cols: usize) -> usize {
    let duration = total_samples as f64 / sample_rate as f64;
    let column_duration = duration / n_cols as f64;
    (column_duration * sample_rate as f64).round_ties_even() as usize
}

/// Copies chunk `col` out of `samples`, zero-padding a short tail.
///
/// Returns `None` when the chunk would start at or past the end.
fn extract_chunk(samples: &[f64], col: usize, column_samples: usize) -> Option<Vec<f64>> {
    let start = col * column_samples;
    if start >= samples.len() {
        return None;
    }
    let end = (start + column_samples).min(samples.len());
    let mut chunk = samples[start..end].to_vec();
    chunk.resize(column_samples, 0.0);
    Some(chunk)
}

/// Recovers an image by per-column quadrature demodulation.
pub fn decode_demod(waveform: &Waveform, config: &SonifyConfig) -> SonifyResult<DecodeResult> {
    config.validate()?;
    if waveform.sample_rate() == 0 {
        return Err(SonifyError::invalid_param("sample_rate", "waveform has a zero sample rate"));
    }

    let (n_rows, n_cols) = (config.rows, config.cols);
    let samples = waveform.samples();
    let column_duration = waveform.duration_seconds() / n_cols as f64;
    let column_samples = column_samples(samples.len(), waveform.sample_rate(), n_cols);

    let tones = ToneTable::new(n_rows, config.fmin, config.fmax);
    let bank = ReferenceBank::new(&tones, column_duration, column_samples);

    log::debug!(
        "demod decode: {} samples, {} columns of {} samples ({:.6}s nominal)",
        samples.len(),
        n_cols,
        column_samples,
        column_duration
    );

    let decode_column = |col: usize| {
        extract_chunk(samples, col, column_samples).map(|chunk| bank.project(&chunk))
    };

    #[cfg(feature = "parallel")]
    let columns: Vec<Option<Vec<f64>>> = (0..n_cols).into_par_iter().map(decode_column).collect();

    #[cfg(not(feature = "parallel"))]
    let columns: Vec<Option<Vec<f64>>> = (0..n_cols).map(decode_column).collect();

    let mut amplitudes = AmplitudeGrid::zeros(n_rows, n_cols);
    let mut columns_decoded = 0;
    for (col, column) in columns.into_iter().enumerate() {
        // Chunk starts only grow, so the first missing column ends decoding.
        let Some(values) = column else { break };
        amplitudes.set_column(col, &values);
        columns_decoded += 1;
    }

    if columns_decoded < n_cols {
        log::warn!(
            "chunk drift: only {} of {} columns start inside the signal; the rest stay zero",
            columns_decoded,
            n_cols
        );
    }

    let image = amplitudes.clone().into_recovered();

    Ok(DecodeResult {
        method: DecodeMethod::Demod,
        image,
        amplitudes,
        detail: DecodeDetail::Demod {
            column_samples,
            columns_decoded,
        },
    })
}
