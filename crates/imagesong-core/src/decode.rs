//! Shared decoder types and method dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SonifyConfig;
use crate::error::{SonifyError, SonifyResult};
use crate::image::{AmplitudeGrid, RecoveredImage};
use crate::waveform::{PcmScaling, Waveform};

/// Image recovery strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeMethod {
    /// STFT magnitude, band-restricted and resampled.
    Spectral,
    /// Per-column quadrature demodulation.
    Demod,
}

impl DecodeMethod {
    /// All methods, in a stable order.
    pub const ALL: [DecodeMethod; 2] = [DecodeMethod::Spectral, DecodeMethod::Demod];

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeMethod::Spectral => "spectral",
            DecodeMethod::Demod => "demod",
        }
    }

    /// How this method scales PCM16 input when loading a WAV file.
    pub fn pcm_scaling(&self) -> PcmScaling {
        match self {
            DecodeMethod::Spectral => PcmScaling::FullScale,
            DecodeMethod::Demod => PcmScaling::Peak,
        }
    }
}

impl fmt::Display for DecodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecodeMethod {
    type Err = SonifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spectral" => Ok(DecodeMethod::Spectral),
            "demod" => Ok(DecodeMethod::Demod),
            other => Err(SonifyError::invalid_param(
                "method",
                format!("unknown decode method '{}' (expected spectral or demod)", other),
            )),
        }
    }
}

/// Method-specific decoding statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeDetail {
    /// Spectral decoder statistics.
    Spectral {
        /// STFT frames analysed.
        frames: usize,
        /// Bins inside the band before resampling.
        band_bins: usize,
    },
    /// Demodulation decoder statistics.
    Demod {
        /// Samples per column chunk after rounding.
        column_samples: usize,
        /// Columns whose chunk started inside the signal.
        columns_decoded: usize,
    },
}

/// Result of decoding a waveform.
#[derive(Debug, Clone)]
pub struct DecodeResult {
    /// Method that produced this result.
    pub method: DecodeMethod,
    /// Normalized, flipped, 8-bit image.
    pub image: RecoveredImage,
    /// Raw amplitudes in tone-row order, before normalization.
    pub amplitudes: AmplitudeGrid,
    /// Method-specific statistics.
    pub detail: DecodeDetail,
}

/// Decodes `waveform` with the chosen method.
pub fn decode(
    waveform: &Waveform,
    config: &SonifyConfig,
    method: DecodeMethod,
) -> SonifyResult<DecodeResult> {
    match method {
        DecodeMethod::Spectral => crate::spectral::decode_spectral(waveform, config),
        DecodeMethod::Demod => crate::demod::decode_demod(waveform, config),
    }
}
