//! Image grids: the encoder's input, the decoders' raw amplitude grid, and
//! the 8-bit recovered image.
//!
//! All grids are row-major. Row 0 is the top of the picture as displayed.

use crate::error::{SonifyError, SonifyResult};

/// Grayscale input image with intensities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Image {
    /// Creates an all-black image.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer, clamping each value into `[0, 1]`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> SonifyResult<Self> {
        if data.len() != rows * cols {
            return Err(SonifyError::ShapeMismatch {
                expected: rows * cols,
                found: data.len(),
            });
        }
        let data = data.into_iter().map(|v| v.clamp(0.0, 1.0)).collect();
        Ok(Self { rows, cols, data })
    }

    /// Builds an image from 8-bit luma bytes (`0..=255` maps to `[0, 1]`).
    pub fn from_luma8(rows: usize, cols: usize, pixels: &[u8]) -> SonifyResult<Self> {
        if pixels.len() != rows * cols {
            return Err(SonifyError::ShapeMismatch {
                expected: rows * cols,
                found: pixels.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: pixels.iter().map(|&p| p as f64 / 255.0).collect(),
        })
    }

    /// Builds an image by evaluating `f(row, col)` for every pixel.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col).clamp(0.0, 1.0));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Intensity at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Row-major intensities.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns a copy with the row order reversed.
    pub fn flipped(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(self.cols.max(1)).rev() {
            data.extend_from_slice(row);
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Returns true if every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }
}

/// Un-normalized per-pixel amplitudes produced by a decoder.
///
/// Row `r` holds tone row `r` (lowest frequency first), so the grid is upside
/// down relative to the displayed image until [`AmplitudeGrid::into_recovered`]
/// flips it.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl AmplitudeGrid {
    /// Creates a zero-filled grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> SonifyResult<Self> {
        if data.len() != rows * cols {
            return Err(SonifyError::ShapeMismatch {
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Amplitude at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Sets the amplitude at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Writes one column, top to bottom in tone-row order.
    pub fn set_column(&mut self, col: usize, values: &[f64]) {
        for (row, &value) in values.iter().enumerate().take(self.rows) {
            self.set(row, col, value);
        }
    }

    /// Row-major amplitudes.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Normalizes to `[0, 1]`, flips to display orientation, and quantizes.
    ///
    /// The minimum is subtracted first; the division by the new maximum is
    /// skipped when it is zero, so a flat grid becomes all-black instead of
    /// NaN. Quantization truncates `v * 255`.
    pub fn into_recovered(self) -> RecoveredImage {
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let min = if min.is_finite() { min } else { 0.0 };
        let mut data: Vec<f64> = self.data.into_iter().map(|v| v - min).collect();

        let max = data.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 {
            for v in &mut data {
                *v /= max;
            }
        }

        let mut pixels = Vec::with_capacity(data.len());
        for row in data.chunks_exact(self.cols.max(1)).rev() {
            pixels.extend(row.iter().map(|&v| (v * 255.0) as u8));
        }

        RecoveredImage {
            rows: self.rows,
            cols: self.cols,
            pixels,
        }
    }
}

/// Final 8-bit grayscale image in display orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredImage {
    rows: usize,
    cols: usize,
    pixels: Vec<u8>,
}

impl RecoveredImage {
    /// Wraps row-major 8-bit pixels.
    pub fn from_pixels(rows: usize, cols: usize, pixels: Vec<u8>) -> SonifyResult<Self> {
        if pixels.len() != rows * cols {
            return Err(SonifyError::ShapeMismatch {
                expected: rows * cols,
                found: pixels.len(),
            });
        }
        Ok(Self { rows, cols, pixels })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Pixel at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.pixels[row * self.cols + col]
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Location and value of the brightest pixel (first one on ties).
    pub fn brightest(&self) -> Option<(usize, usize, u8)> {
        let mut best: Option<(usize, u8)> = None;
        for (idx, &p) in self.pixels.iter().enumerate() {
            if best.map_or(true, |(_, b)| p > b) {
                best = Some((idx, p));
            }
        }
        best.map(|(idx, p)| (idx / self.cols, idx % self.cols, p))
    }

    /// Converts back into a `[0, 1]` image.
    pub fn to_image(&self) -> Image {
        Image {
            rows: self.rows,
            cols: self.cols,
            data: self.pixels.iter().map(|&p| p as f64 / 255.0).collect(),
        }
    }
}
