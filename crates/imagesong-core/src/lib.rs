//! ImageSong Core
//!
//! Turns a grayscale image into audio whose spectrogram draws the image, and
//! recovers an approximation of the image from that audio.
//!
//! # Overview
//!
//! Each image row is assigned a sinusoidal tone, evenly spaced in frequency
//! between `fmin` (bottom row) and `fmax` (top row). Each column is a time
//! slot. Pixel brightness sets the amplitude of the row's tone during the
//! column's slot. Two decoders run the mapping backwards:
//!
//! - **Spectral** - STFT magnitude, restricted to the tone band and resampled
//!   onto the image grid
//! - **Demod** - per-column quadrature demodulation against sine and cosine
//!   references at every tone frequency
//!
//! # Determinism
//!
//! Tone phases come from a PCG32 generator seeded by the config. Given the
//! same image, config, and seed, the encoder's PCM output is byte-identical
//! across runs. Both decoders are pure functions of their input.
//!
//! # Example
//!
//! ```ignore
//! use imagesong_core::{decode, encode, DecodeMethod, Image, SonifyConfig};
//!
//! let config = SonifyConfig::default();
//! let image = Image::from_luma8(512, 512, &pixels)?;
//! let encoded = encode(&image, &config)?;
//! std::fs::write("song.wav", &encoded.to_wav().wav_data)?;
//!
//! let decoded = decode(&encoded.waveform, &config, DecodeMethod::Demod)?;
//! imagesong_core::png::write_recovered(&decoded.image, path, &Default::default())?;
//! ```
//!
//! # Crate Structure
//!
//! - [`encode()`] - Image to waveform synthesis
//! - [`decode()`] - Waveform to image recovery, dispatching on [`DecodeMethod`]
//! - [`config`] - Shared parameters and validation
//! - [`grid`] - Tone frequencies, column offsets, and linear resampling
//! - [`spectral`] - STFT magnitude decoder
//! - [`demod`] - Quadrature demodulation decoder
//! - [`wav`] - Deterministic WAV writer and `hound`-backed reader
//! - [`png`] - Grayscale PNG output

pub mod config;
pub mod decode;
pub mod demod;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod image;
pub mod png;
pub mod rng;
pub mod spectral;
pub mod wav;
pub mod waveform;

// Re-export main types at crate root
pub use config::{SonifyConfig, ToneSpan};
pub use decode::{decode, DecodeDetail, DecodeMethod, DecodeResult};
pub use encoder::{encode, EncodeResult};
pub use error::{SonifyError, SonifyResult};
pub use image::{AmplitudeGrid, Image, RecoveredImage};
pub use wav::WavResult;
pub use waveform::{PcmScaling, Waveform};
