//! PNG container boundary. The raster and its single metadata pair are
//! written as an 8-bit RGB PNG with one tEXt chunk; loading returns both so
//! the restore path can run against the same file. This module is the only
//! persistence in the crate.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::RgbImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("container file unreadable: {0}")]
    Io(String),
    #[error("png encode failed: {0}")]
    Encode(String),
    #[error("png decode failed: {0}")]
    Decode(String),
    #[error("unsupported raster format: {0}")]
    UnsupportedFormat(String),
}

/// A decoded PNG: the raster plus every tEXt keyword/value pair it carried.
#[derive(Debug)]
pub struct LoadedContainer {
    image: RgbImage,
    texts: Vec<(String, String)>,
}

impl LoadedContainer {
    pub fn new(image: RgbImage, texts: Vec<(String, String)>) -> Self {
        Self { image, texts }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Looks up a metadata value by its field name.
    pub fn text(&self, keyword: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|(name, _)| name == keyword)
            .map(|(_, value)| value.as_str())
    }

    pub fn texts(&self) -> &[(String, String)] {
        &self.texts
    }
}

/// Writes the raster and one metadata pair into a PNG file. The text chunk is
/// emitted ahead of the image data so it survives partial readers.
pub fn save_png(
    path: impl AsRef<Path>,
    image: &RgbImage,
    keyword: &str,
    text: &str,
) -> Result<(), ContainerError> {
    let file = File::create(path).map_err(|e| ContainerError::Io(format!("{e}")))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .add_text_chunk(keyword.to_string(), text.to_string())
        .map_err(|e| ContainerError::Encode(format!("{e}")))?;

    let mut writer = encoder
        .write_header()
        .map_err(|e| ContainerError::Encode(format!("{e}")))?;
    writer
        .write_image_data(image.as_raw())
        .map_err(|e| ContainerError::Encode(format!("{e}")))?;
    writer
        .finish()
        .map_err(|e| ContainerError::Encode(format!("{e}")))?;
    Ok(())
}

/// Loads a PNG back into a raster and its text metadata. Only the 8-bit RGB
/// layout this crate writes is accepted.
pub fn load_png(path: impl AsRef<Path>) -> Result<LoadedContainer, ContainerError> {
    let file = File::open(path).map_err(|e| ContainerError::Io(format!("{e}")))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| ContainerError::Decode(format!("{e}")))?;

    let mut buffer = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buffer)
        .map_err(|e| ContainerError::Decode(format!("{e}")))?;
    if frame.color_type != png::ColorType::Rgb || frame.bit_depth != png::BitDepth::Eight {
        return Err(ContainerError::UnsupportedFormat(format!(
            "expected 8-bit RGB, got {:?}/{:?}",
            frame.color_type, frame.bit_depth
        )));
    }
    buffer.truncate(frame.buffer_size());
    let image = RgbImage::from_raw(frame.width, frame.height, buffer)
        .ok_or_else(|| ContainerError::Decode("raster size mismatch".to_string()))?;

    // Collected after the frame so chunks on either side of the image data
    // are visible.
    let texts = reader
        .info()
        .uncompressed_latin1_text
        .iter()
        .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
        .collect();

    Ok(LoadedContainer::new(image, texts))
}
