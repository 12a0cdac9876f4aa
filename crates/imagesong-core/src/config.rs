//! Pipeline configuration.
//!
//! Every tunable of the encoder and both decoders lives in [`SonifyConfig`].
//! The struct deserializes from JSON with per-field defaults, so a config file
//! only needs the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{SonifyError, SonifyResult};

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
/// Default lower edge of the tone band in Hz.
pub const DEFAULT_FMIN: f64 = 300.0;
/// Default upper edge of the tone band in Hz.
pub const DEFAULT_FMAX: f64 = 8000.0;
/// Default working grid size (rows and columns).
pub const DEFAULT_GRID: usize = 512;
/// Pixels at or below this intensity are silent.
pub const DEFAULT_ACTIVATION_THRESHOLD: f64 = 0.05;
/// Columns per second of audio.
pub const DEFAULT_DURATION_SCALE: u32 = 64;
/// Default STFT window length in samples.
pub const DEFAULT_ANALYSIS_WINDOW: usize = 4096;
/// Default STFT hop length in samples.
pub const DEFAULT_ANALYSIS_HOP: usize = 512;

/// How long a single pixel's tone sounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneSpan {
    /// The tone is written only into its column's sample window.
    #[default]
    Column,
    /// The tone covers the entire waveform; the column only sets its phase.
    Sustained,
}

/// Configuration shared by the encoder and decoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SonifyConfig {
    /// Sample rate of the synthesized waveform in Hz.
    pub sample_rate: u32,
    /// Frequency of the lowest tone row in Hz.
    pub fmin: f64,
    /// Frequency of the highest tone row in Hz.
    pub fmax: f64,
    /// Working grid height (tone rows).
    pub rows: usize,
    /// Working grid width (time columns).
    pub cols: usize,
    /// Intensity a pixel must exceed to produce a tone.
    pub activation_threshold: f64,
    /// Audio length is `sample_rate * cols / duration_scale` samples.
    pub duration_scale: u32,
    /// STFT window length (spectral decoder only).
    pub analysis_window: usize,
    /// STFT hop length (spectral decoder only).
    pub analysis_hop: usize,
    /// Seed for the phase generator.
    pub seed: u32,
    /// Tone span used by the encoder.
    pub tone_span: ToneSpan,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            fmin: DEFAULT_FMIN,
            fmax: DEFAULT_FMAX,
            rows: DEFAULT_GRID,
            cols: DEFAULT_GRID,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            duration_scale: DEFAULT_DURATION_SCALE,
            analysis_window: DEFAULT_ANALYSIS_WINDOW,
            analysis_hop: DEFAULT_ANALYSIS_HOP,
            seed: 0,
            tone_span: ToneSpan::Column,
        }
    }
}

impl SonifyConfig {
    /// Parses a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> SonifyResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SonifyError::invalid_param("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).expect("config serialization cannot fail")
    }

    /// Sets the working grid size.
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Sets the tone band.
    pub fn with_band(mut self, fmin: f64, fmax: f64) -> Self {
        self.fmin = fmin;
        self.fmax = fmax;
        self
    }

    /// Sets the phase seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Number of samples the encoder produces for the configured width.
    pub fn audio_length(&self) -> usize {
        (self.sample_rate as usize * self.cols) / self.duration_scale as usize
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> SonifyResult<()> {
        if self.sample_rate == 0 {
            return Err(SonifyError::invalid_param("sample_rate", "must be positive"));
        }
        if !(self.fmin.is_finite() && self.fmin > 0.0) {
            return Err(SonifyError::invalid_param(
                "fmin",
                format!("must be a positive frequency, got {}", self.fmin),
            ));
        }
        if !(self.fmax.is_finite() && self.fmax > self.fmin) {
            return Err(SonifyError::invalid_param(
                "fmax",
                format!("must exceed fmin ({}), got {}", self.fmin, self.fmax),
            ));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if self.fmax > nyquist {
            return Err(SonifyError::invalid_param(
                "fmax",
                format!("{} Hz is above the Nyquist frequency {} Hz", self.fmax, nyquist),
            ));
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(SonifyError::invalid_param(
                "rows/cols",
                format!("grid must be non-empty, got {}x{}", self.rows, self.cols),
            ));
        }
        if !(0.0..=1.0).contains(&self.activation_threshold) {
            return Err(SonifyError::invalid_param(
                "activation_threshold",
                format!("must be within [0, 1], got {}", self.activation_threshold),
            ));
        }
        if self.duration_scale == 0 {
            return Err(SonifyError::invalid_param("duration_scale", "must be positive"));
        }
        if self.analysis_window < 2 {
            return Err(SonifyError::invalid_param(
                "analysis_window",
                format!("must be at least 2 samples, got {}", self.analysis_window),
            ));
        }
        if self.analysis_hop == 0 || self.analysis_hop > self.analysis_window {
            return Err(SonifyError::invalid_param(
                "analysis_hop",
                format!(
                    "must be within [1, {}], got {}",
                    self.analysis_window, self.analysis_hop
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = SonifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio_length(), 352_800);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SonifyConfig::from_json(r#"{ "seed": 7, "tone_span": "sustained" }"#).unwrap();
        assert_eq!(
            config,
            SonifyConfig {
                seed: 7,
                tone_span: ToneSpan::Sustained,
                ..SonifyConfig::default()
            }
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SonifyConfig::default().with_grid(64, 32).with_seed(99);
        let parsed = SonifyConfig::from_json(&config.to_json_pretty()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SonifyConfig::from_json(r#"{ "sample_rat": 8000 }"#).unwrap_err();
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = SonifyConfig::default().with_band(8000.0, 300.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fmax"));
    }

    #[test]
    fn test_band_above_nyquist_rejected() {
        let config = SonifyConfig {
            sample_rate: 8000,
            ..SonifyConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Nyquist"));
    }

    #[test]
    fn test_zero_grid_rejected() {
        let config = SonifyConfig::default().with_grid(0, 16);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hop_larger_than_window_rejected() {
        let config = SonifyConfig {
            analysis_window: 256,
            analysis_hop: 512,
            ..SonifyConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis_hop"));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = SonifyConfig {
            activation_threshold: 1.5,
            ..SonifyConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
