//! Deterministic grayscale PNG I/O for recovered images.
//!
//! Fixed compression and filter settings keep the output byte-identical for
//! identical pixels. The png crate writes no timestamps by default.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};

use crate::error::{SonifyError, SonifyResult};
use crate::image::RecoveredImage;

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level.
    pub compression: Compression,
    /// Row filter.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smallest files, slowest encode.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

fn dimension(name: &str, value: usize) -> SonifyResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| SonifyError::invalid_param(name, format!("{} is not a valid PNG dimension", value)))
}

/// Writes a recovered image to a PNG file.
pub fn write_recovered(image: &RecoveredImage, path: &Path, config: &PngConfig) -> SonifyResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_recovered_to_writer(image, &mut writer, config)?;
    writer.flush()?;
    Ok(())
}

/// Writes a recovered image as an 8-bit grayscale PNG to any writer.
pub fn write_recovered_to_writer<W: Write>(
    image: &RecoveredImage,
    writer: W,
    config: &PngConfig,
) -> SonifyResult<()> {
    let width = dimension("cols", image.cols())?;
    let height = dimension("rows", image.rows())?;

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(image.pixels())?;
    png_writer.finish()?;

    Ok(())
}

/// Encodes a recovered image to PNG bytes.
pub fn write_recovered_to_vec(image: &RecoveredImage, config: &PngConfig) -> SonifyResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_recovered_to_writer(image, &mut buffer, config)?;
    Ok(buffer)
}

/// Reads a grayscale PNG file back into a recovered image.
pub fn read_recovered(path: &Path) -> SonifyResult<RecoveredImage> {
    if !path.exists() {
        return Err(SonifyError::not_found(path));
    }
    let file = std::fs::File::open(path)?;
    read_recovered_from(BufReader::new(file))
}

/// Decodes grayscale PNG data.
///
/// 16-bit and sub-byte depths are converted to 8 bits and an alpha channel
/// is dropped. Color images are rejected.
pub fn read_recovered_from<R: BufRead>(reader: R) -> SonifyResult<RecoveredImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (rows, cols) = (info.height as usize, info.width as usize);
    let pixels = match info.color_type {
        ColorType::Grayscale => buf,
        ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|px| px[0]).collect(),
        other => {
            return Err(SonifyError::invalid_param(
                "png",
                format!("expected a grayscale image, found {:?}", other),
            ))
        }
    };

    RecoveredImage::from_pixels(rows, cols, pixels)
}
