//! Mono waveform and the PCM16 codec used to persist it.

/// Full-scale multiplier for float → PCM16 conversion.
pub const PCM16_SCALE: f64 = 32767.0;

/// Divisor that maps the full i16 range into `[-1, 1)`.
pub const PCM16_FULL_SCALE: f64 = 32768.0;

/// How PCM16 samples are scaled back into floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmScaling {
    /// Divide by the largest absolute sample, so the peak becomes ±1.
    Peak,
    /// Divide by 32768 regardless of the signal level.
    FullScale,
}

/// A finite mono signal at a fixed sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Waveform {
    /// Wraps float samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Creates `len` samples of silence.
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Decodes PCM16 samples into floats.
    ///
    /// An all-zero input stays all-zero under either scaling.
    pub fn from_pcm16(pcm: &[i16], sample_rate: u32, scaling: PcmScaling) -> Self {
        let divisor = match scaling {
            PcmScaling::Peak => pcm.iter().map(|&s| (s as f64).abs()).fold(0.0, f64::max),
            PcmScaling::FullScale => PCM16_FULL_SCALE,
        };
        let samples = if divisor > 0.0 {
            pcm.iter().map(|&s| s as f64 / divisor).collect()
        } else {
            vec![0.0; pcm.len()]
        };
        Self::new(samples, sample_rate)
    }

    /// Samples as floats.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consumes the waveform, returning its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the waveform has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
    }

    /// Returns true if every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }

    /// Scales the signal so its peak is exactly 1. Silence is left as is.
    pub fn peak_normalized(mut self) -> Self {
        let peak = self.peak();
        if peak > 0.0 {
            for s in &mut self.samples {
                *s /= peak;
            }
        }
        self
    }

    /// Quantizes to PCM16: clamp to `[-1, 1]`, scale by 32767, truncate.
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * PCM16_SCALE) as i16)
            .collect()
    }
}

/// Serializes PCM16 samples as little-endian bytes.
pub fn pcm16_to_bytes(pcm: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pcm.len() * 2);
    for &sample in pcm {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// BLAKE3 hash of the PCM16 bytes, as lowercase hex.
pub fn pcm_hash(pcm: &[i16]) -> String {
    blake3::hash(&pcm16_to_bytes(pcm)).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pcm16_truncates() {
        let waveform = Waveform::new(vec![0.0, 1.0, -1.0, 0.5, -0.5, 0.99999], 8000);
        let pcm = waveform.to_pcm16();
        // 0.5 * 32767 = 16383.5, truncated toward zero.
        assert_eq!(pcm, vec![0, 32767, -32767, 16383, -16383, 32766]);
    }

    #[test]
    fn test_to_pcm16_clips() {
        let waveform = Waveform::new(vec![2.0, -2.0], 8000);
        assert_eq!(waveform.to_pcm16(), vec![32767, -32767]);
    }

    #[test]
    fn test_from_pcm16_peak_scaling() {
        let waveform = Waveform::from_pcm16(&[100, -200, 50], 8000, PcmScaling::Peak);
        assert_eq!(waveform.samples(), &[0.5, -1.0, 0.25]);
    }

    #[test]
    fn test_from_pcm16_full_scale() {
        let waveform = Waveform::from_pcm16(&[16384, -32768], 8000, PcmScaling::FullScale);
        assert_eq!(waveform.samples(), &[0.5, -1.0]);
    }

    #[test]
    fn test_from_pcm16_silence() {
        for scaling in [PcmScaling::Peak, PcmScaling::FullScale] {
            let waveform = Waveform::from_pcm16(&[0, 0, 0], 8000, scaling);
            assert!(waveform.is_silent());
            assert_eq!(waveform.len(), 3);
        }
    }

    #[test]
    fn test_peak_normalized() {
        let waveform = Waveform::new(vec![0.25, -0.5], 8000).peak_normalized();
        assert_eq!(waveform.samples(), &[0.5, -1.0]);

        let silent = Waveform::silence(4, 8000).peak_normalized();
        assert!(silent.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_duration() {
        let waveform = Waveform::silence(22050, 44100);
        assert_eq!(waveform.duration_seconds(), 0.5);
    }

    #[test]
    fn test_pcm_hash_format() {
        let hash = pcm_hash(&[1, 2, 3]);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, pcm_hash(&[1, 2, 3]));
        assert_ne!(hash, pcm_hash(&[1, 2, 4]));
    }
}
