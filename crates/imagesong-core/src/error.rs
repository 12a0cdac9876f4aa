//! Error types for the sonification pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for sonification operations.
pub type SonifyResult<T> = Result<T, SonifyError>;

/// Errors that can occur while encoding or decoding.
///
/// All-zero images and waveforms are not errors: normalization is skipped
/// and the pipelines return silent/black output.
#[derive(Debug, Error)]
pub enum SonifyError {
    /// Input image or audio file does not exist.
    #[error("input not found: {}", path.display())]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Invalid configuration value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// A pixel or sample buffer does not match its declared shape.
    #[error("shape mismatch: expected {expected} values, found {found}")]
    ShapeMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        found: usize,
    },

    /// No analysis bin lies inside the encoding band.
    #[error("no analysis bin lies within [{fmin}, {fmax}] Hz")]
    EmptyBand {
        /// Lower band edge.
        fmin: f64,
        /// Upper band edge.
        fmax: f64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV container error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// PNG decoding error.
    #[error("PNG decoding error: {0}")]
    PngDecode(#[from] png::DecodingError),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),
}

impl SonifyError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an input-not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Returns a stable error code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            SonifyError::InputNotFound { .. } => "SONIFY_001",
            SonifyError::InvalidParameter { .. } => "SONIFY_002",
            SonifyError::ShapeMismatch { .. } => "SONIFY_003",
            SonifyError::EmptyBand { .. } => "SONIFY_004",
            SonifyError::Io(_) => "SONIFY_005",
            SonifyError::Wav(_) => "SONIFY_006",
            SonifyError::PngDecode(_) => "SONIFY_007",
            SonifyError::PngEncode(_) => "SONIFY_008",
        }
    }
}
