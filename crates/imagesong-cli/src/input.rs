//! Input loading: configuration files, command-line overrides, source images.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;

use imagesong_core::{Image, SonifyConfig, SonifyError};

/// Per-flag overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub sample_rate: Option<u32>,
    pub fmin: Option<f64>,
    pub fmax: Option<f64>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub seed: Option<u32>,
}

impl ConfigOverrides {
    /// Applies every set override to `config`.
    pub fn apply(&self, mut config: SonifyConfig) -> SonifyConfig {
        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(fmin) = self.fmin {
            config.fmin = fmin;
        }
        if let Some(fmax) = self.fmax {
            config.fmax = fmax;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}

/// Loads the config file (or defaults), applies overrides, and validates.
pub fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SonifyConfig> {
    let base = match path {
        Some(path) => {
            if !path.exists() {
                return Err(SonifyError::not_found(path).into());
            }
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str::<SonifyConfig>(&json)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => SonifyConfig::default(),
    };

    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

/// Loads a raster image as grayscale, resized to `rows × cols`.
///
/// Any format the `image` crate was built with is accepted. Color images are
/// converted to luma; resizing uses a triangle (bilinear) filter.
pub fn load_image(path: &Path, rows: usize, cols: usize) -> Result<Image> {
    if !path.exists() {
        return Err(SonifyError::not_found(path).into());
    }
    let source = image::open(path)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?
        .to_luma8();

    let width = u32::try_from(cols).context("cols does not fit in u32")?;
    let height = u32::try_from(rows).context("rows does not fit in u32")?;
    log::debug!(
        "resizing {}x{} source to {}x{}",
        source.width(),
        source.height(),
        width,
        height
    );
    let resized = if source.dimensions() == (width, height) {
        source
    } else {
        image::imageops::resize(&source, width, height, FilterType::Triangle)
    };

    Ok(Image::from_luma8(rows, cols, resized.as_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, SonifyConfig::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sample_rate": 22050, "fmax": 6000, "seed": 3}"#).unwrap();

        let overrides = ConfigOverrides {
            seed: Some(9),
            rows: Some(64),
            ..Default::default()
        };
        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.fmax, 6000.0);
        assert_eq!(config.seed, 9);
        assert_eq!(config.rows, 64);
        assert_eq!(config.cols, 512);
    }

    #[test]
    fn test_override_is_validated() {
        let overrides = ConfigOverrides {
            fmax: Some(30_000.0),
            ..Default::default()
        };
        let err = resolve_config(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("fmax"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = resolve_config(Some(Path::new("/no/such/config.json")), &ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SonifyError>(),
            Some(SonifyError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_config_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sample_rte": 22050}"#).unwrap();
        assert!(resolve_config(Some(&path), &ConfigOverrides::default()).is_err());
    }

    #[test]
    fn test_load_image_resizes_and_converts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.png");
        let source = image::RgbImage::from_fn(10, 6, |x, _| {
            if x < 5 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        source.save(&path).unwrap();

        let loaded = load_image(&path, 4, 8).unwrap();
        assert_eq!(loaded.rows(), 4);
        assert_eq!(loaded.cols(), 8);
        assert!(loaded.get(0, 0) < 0.01);
        assert!(loaded.get(3, 7) > 0.99);
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(Path::new("/no/such/image.png"), 8, 8).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SonifyError>(),
            Some(SonifyError::InputNotFound { .. })
        ));
    }
}
