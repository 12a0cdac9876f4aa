//! WAV container I/O.
//!
//! Writing is hand-rolled: a mono 16-bit PCM RIFF file with no timestamps or
//! other variable metadata, so equal samples always produce equal bytes.
//! Reading goes through `hound` and accepts any integer or float WAV,
//! averaging multichannel frames down to mono.

use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use crate::error::{SonifyError, SonifyResult};
use crate::waveform::{pcm16_to_bytes, pcm_hash, PcmScaling, Waveform};

/// Bits per sample written by this module.
const BITS_PER_SAMPLE: u16 = 16;

/// Writes a complete mono PCM16 WAV file to a writer.
pub fn write_wav<W: Write>(writer: &mut W, sample_rate: u32, pcm: &[i16]) -> io::Result<()> {
    let pcm_data = pcm16_to_bytes(pcm);
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size;
    let block_align = BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * block_align as u32;

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Mono
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(&pcm_data)?;

    Ok(())
}

/// Writes a mono PCM16 WAV file to a byte vector.
pub fn write_wav_to_vec(sample_rate: u32, pcm: &[i16]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(44 + pcm.len() * 2);
    write_wav(&mut buffer, sample_rate, pcm).expect("writing to Vec should not fail");
    buffer
}

/// Writes a mono PCM16 WAV file to disk.
pub fn write_wav_file(path: &Path, sample_rate: u32, pcm: &[i16]) -> SonifyResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_wav(&mut writer, sample_rate, pcm)?;
    writer.flush()?;
    Ok(())
}

/// Result of WAV file generation.
#[derive(Debug)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of PCM data only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Builds the WAV bytes and PCM hash for mono PCM16 samples.
    pub fn from_pcm16(pcm: &[i16], sample_rate: u32) -> Self {
        Self {
            wav_data: write_wav_to_vec(sample_rate, pcm),
            pcm_hash: pcm_hash(pcm),
            sample_rate,
            num_samples: pcm.len(),
        }
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }
}

/// Reads a WAV file from disk into a mono waveform.
pub fn read_wav_file(path: &Path, scaling: PcmScaling) -> SonifyResult<Waveform> {
    if !path.exists() {
        return Err(SonifyError::not_found(path));
    }
    let bytes = std::fs::read(path)?;
    read_wav(Cursor::new(bytes), scaling)
}

/// Reads WAV data into a mono waveform.
///
/// 16-bit integer files go through [`Waveform::from_pcm16`] with `scaling`.
/// Other integer widths are divided by their own full scale, and float files
/// are taken as is; with [`PcmScaling::Peak`] both are then peak-normalized.
pub fn read_wav<R: Read>(reader: R, scaling: PcmScaling) -> SonifyResult<Waveform> {
    let reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let sample_rate = spec.sample_rate;

    let interleaved: Vec<f64> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            let pcm = reader
                .into_samples::<i16>()
                .collect::<Result<Vec<_>, _>>()?;
            if channels == 1 {
                return Ok(Waveform::from_pcm16(&pcm, sample_rate, scaling));
            }
            pcm.into_iter().map(|s| s as f64).collect()
        }
        (hound::SampleFormat::Int, bits) => {
            let max_val = (1i64 << (bits - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f64 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
        (hound::SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|s| s as f64))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mono: Vec<f64> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
        .collect();

    let waveform = if spec.sample_format == hound::SampleFormat::Int && spec.bits_per_sample == 16
    {
        // Averaged PCM16 frames are still in integer units.
        let divisor = match scaling {
            PcmScaling::Peak => 1.0,
            PcmScaling::FullScale => crate::waveform::PCM16_FULL_SCALE,
        };
        Waveform::new(mono.into_iter().map(|s| s / divisor).collect(), sample_rate)
    } else {
        Waveform::new(mono, sample_rate)
    };

    Ok(match scaling {
        PcmScaling::Peak => waveform.peak_normalized(),
        PcmScaling::FullScale => waveform,
    })
}
