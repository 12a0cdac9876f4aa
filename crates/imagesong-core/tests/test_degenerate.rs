//! Degenerate inputs: blank images, silent or very short waveforms, tiny grids.

use imagesong_core::spectral::MagnitudeSurface;
use imagesong_core::{
    decode, encode, DecodeDetail, DecodeMethod, Image, SonifyConfig, SonifyError, Waveform,
};

fn small_config() -> SonifyConfig {
    SonifyConfig {
        sample_rate: 8000,
        fmin: 400.0,
        fmax: 3200.0,
        duration_scale: 8,
        analysis_window: 256,
        analysis_hop: 64,
        ..SonifyConfig::default()
    }
    .with_grid(8, 8)
}

#[test]
fn test_blank_image_roundtrip_is_black() {
    let config = small_config();
    let encoded = encode(&Image::new(8, 8), &config).unwrap();
    assert!(encoded.waveform.is_silent());
    assert_eq!(encoded.active_pixels, 0);

    for method in DecodeMethod::ALL {
        let decoded = decode(&encoded.waveform, &config, method).unwrap();
        assert!(decoded.image.pixels().iter().all(|&p| p == 0), "{method}");
    }
}

#[test]
fn test_empty_waveform() {
    let config = small_config();
    let waveform = Waveform::new(Vec::new(), 8000);
    for method in DecodeMethod::ALL {
        let decoded = decode(&waveform, &config, method).unwrap();
        assert_eq!(decoded.image.pixels().len(), 64);
        assert!(decoded.image.pixels().iter().all(|&p| p == 0), "{method}");
    }
}

#[test]
fn test_waveform_shorter_than_window() {
    let config = small_config();
    let samples: Vec<f64> = (0..40).map(|i| (i as f64 * 0.7).sin()).collect();
    let waveform = Waveform::new(samples, 8000);

    let spectral = decode(&waveform, &config, DecodeMethod::Spectral).unwrap();
    assert!(matches!(spectral.detail, DecodeDetail::Spectral { frames: 1, .. }));
    assert_eq!(spectral.image.rows(), 8);
    assert_eq!(spectral.image.cols(), 8);

    // round(40 / 8) = 5 samples per chunk, every chunk starts inside.
    let demod = decode(&waveform, &config, DecodeMethod::Demod).unwrap();
    assert!(matches!(
        demod.detail,
        DecodeDetail::Demod {
            column_samples: 5,
            columns_decoded: 8
        }
    ));
}

#[test]
fn test_single_pixel_grid() {
    let config = small_config().with_grid(1, 1);
    let encoded = encode(&Image::from_fn(1, 1, |_, _| 1.0), &config).unwrap();
    assert_eq!(encoded.waveform.len(), 1000);

    for method in DecodeMethod::ALL {
        let decoded = decode(&encoded.waveform, &config, method).unwrap();
        assert_eq!(decoded.image.pixels(), &[0], "{method}");
    }
}

#[test]
fn test_band_between_bins_is_rejected() {
    // 256-point window at 8 kHz puts bins every 31.25 Hz.
    let config = SonifyConfig {
        sample_rate: 8000,
        fmin: 1001.0,
        fmax: 1030.0,
        analysis_window: 256,
        analysis_hop: 64,
        ..SonifyConfig::default()
    }
    .with_grid(4, 4);
    let waveform = Waveform::silence(2000, 8000);
    let err = decode(&waveform, &config, DecodeMethod::Spectral).unwrap_err();
    assert!(matches!(err, SonifyError::EmptyBand { .. }));
    assert_eq!(err.code(), "SONIFY_004");
}

#[test]
fn test_resample_identity_on_equal_dimensions() {
    let data: Vec<f64> = (0..12).map(|v| v as f64 * 0.5).collect();
    let surface = MagnitudeSurface::new(vec![100.0, 200.0, 300.0], 4, data.clone()).unwrap();
    let grid = surface.resample(3, 4);
    assert_eq!(grid.data(), data.as_slice());
}

#[test]
fn test_invalid_configs_rejected_before_work() {
    let image = Image::from_fn(8, 8, |_, _| 1.0);
    let bad = [
        small_config().with_band(3200.0, 400.0),
        small_config().with_band(-5.0, 400.0),
        small_config().with_band(400.0, 5000.0),
        SonifyConfig {
            duration_scale: 0,
            ..small_config()
        },
    ];
    for config in bad {
        let err = encode(&image, &config).unwrap_err();
        assert!(matches!(err, SonifyError::InvalidParameter { .. }), "{config:?}");
    }
}
