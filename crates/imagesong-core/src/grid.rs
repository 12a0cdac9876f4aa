//! Row-to-frequency and column-to-time mappings, plus the 1-D helpers the
//! pipelines share (linear spacing and linear resampling).

use std::ops::Range;

/// Returns `n` evenly spaced values from `start` towards `stop`.
///
/// With `endpoint` the last value is exactly `stop`; without it the values
/// cover `[start, stop)` in steps of `(stop - start) / n`.
pub fn linspace(start: f64, stop: f64, n: usize, endpoint: bool) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let div = if endpoint { n - 1 } else { n };
            let step = (stop - start) / div as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            if endpoint {
                values[n - 1] = stop;
            }
            values
        }
    }
}

/// Resamples `values` onto `n_out` points by linear interpolation.
///
/// Target positions are evenly spaced over the full source index range
/// `[0, len - 1]`, so the first and last source values are always kept and
/// nothing is extrapolated. Equal lengths return the input unchanged, and a
/// linear blend of non-negative values stays non-negative.
pub fn resample_linear(values: &[f64], n_out: usize) -> Vec<f64> {
    let n = values.len();
    if n == n_out {
        return values.to_vec();
    }
    if n == 0 {
        return vec![0.0; n_out];
    }
    if n == 1 {
        return vec![values[0]; n_out];
    }

    let last = (n - 1) as f64;
    linspace(0.0, last, n_out, true)
        .into_iter()
        .map(|x| {
            let i = x.floor() as usize;
            if i >= n - 1 {
                return values[n - 1];
            }
            let frac = x - i as f64;
            if frac == 0.0 {
                values[i]
            } else {
                values[i] * (1.0 - frac) + values[i + 1] * frac
            }
        })
        .collect()
}

/// Frequencies assigned to the tone rows, lowest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneTable {
    frequencies: Vec<f64>,
}

impl ToneTable {
    /// Spaces `n_rows` tones linearly over `[fmin, fmax]`.
    pub fn new(n_rows: usize, fmin: f64, fmax: f64) -> Self {
        Self {
            frequencies: linspace(fmin, fmax, n_rows, true),
        }
    }

    /// Number of tone rows.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency of tone row `row` in Hz.
    #[inline]
    pub fn frequency(&self, row: usize) -> f64 {
        self.frequencies[row]
    }

    /// All frequencies, lowest first.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Spacing between adjacent tones in Hz (zero for a single row).
    pub fn spacing(&self) -> f64 {
        match self.frequencies.len() {
            0 | 1 => 0.0,
            n => (self.frequencies[n - 1] - self.frequencies[0]) / (n - 1) as f64,
        }
    }
}

/// Start times assigned to the image columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    offsets: Vec<f64>,
    duration: f64,
}

impl TimeGrid {
    /// Splits `[0, duration)` into `n_cols` equal steps.
    pub fn new(n_cols: usize, duration: f64) -> Self {
        let offsets = (0..n_cols)
            .map(|c| c as f64 / n_cols as f64 * duration)
            .collect();
        Self { offsets, duration }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if the grid has no columns.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Start time of column `col` in seconds.
    #[inline]
    pub fn offset(&self, col: usize) -> f64 {
        self.offsets[col]
    }

    /// All column start times.
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Total covered duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sample indices owned by column `col` in a buffer of `n_samples`.
    ///
    /// Windows tile the buffer exactly: consecutive columns share a boundary
    /// and the last window ends at `n_samples`.
    pub fn sample_window(&self, col: usize, n_samples: usize) -> Range<usize> {
        let n_cols = self.offsets.len();
        (col * n_samples) / n_cols..((col + 1) * n_samples) / n_cols
    }
}
