//! Render options for the identicon pipeline. Options can be constructed in
//! code or loaded from a small JSON file; either way they are validated once
//! up front so the drawing code never has to re-check geometry.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("options file unreadable: {0}")]
    Io(String),
    #[error("options parse failed: {0}")]
    Parse(String),
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("image size {image_size} cannot hold a single {cell_size}px cell")]
    ImageTooSmall { image_size: u32, cell_size: u32 },
    #[error("cell gap {cell_gap} leaves no drawable area inside a {cell_size}px cell")]
    GapTooLarge { cell_size: u32, cell_gap: u32 },
    #[error("fill threshold {0} is outside the range 0.0..=1.0")]
    ThresholdOutOfRange(f64),
    #[error("pattern is {got} cells wide but the options describe a {expected}-cell grid")]
    GridMismatch { expected: u32, got: u32 },
}

/// Where the CTR nonce comes from.
///
/// `Derived` reproduces the original scheme: the nonce is a truncated digest
/// of text and key, so the whole pipeline is deterministic but two unrelated
/// texts colliding on that truncation would share a keystream under the same
/// key. `Random` trades determinism of the image for a fresh nonce per call;
/// the stored payload format is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    #[default]
    Derived,
    Random,
}

/// Geometry and sampling knobs for one identicon. Field names match the
/// recognized JSON options (`imageSize`, `cellSize`, `fillThreshold`,
/// `cellGap`, `nonceMode`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    #[serde(rename = "imageSize")]
    pub image_size: u32,
    #[serde(rename = "cellSize")]
    pub cell_size: u32,
    #[serde(rename = "fillThreshold")]
    pub fill_threshold: f64,
    #[serde(rename = "cellGap")]
    pub cell_gap: u32,
    #[serde(rename = "nonceMode")]
    pub nonce_mode: NonceMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_size: 5500,
            cell_size: 500,
            fill_threshold: 0.5,
            cell_gap: 10,
            nonce_mode: NonceMode::Derived,
        }
    }
}

impl RenderOptions {
    /// Number of cells along one edge; the trailing remainder of an image
    /// size that is not a cell multiple stays background.
    pub fn grid_count(&self) -> u32 {
        self.image_size / self.cell_size
    }

    /// Checks the geometry invariants: at least one cell must fit, and the
    /// inset gap must leave a non-empty square inside each cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.image_size < self.cell_size {
            return Err(ConfigError::ImageTooSmall {
                image_size: self.image_size,
                cell_size: self.cell_size,
            });
        }
        if self.cell_size <= 2 * self.cell_gap {
            return Err(ConfigError::GapTooLarge {
                cell_size: self.cell_size,
                cell_gap: self.cell_gap,
            });
        }
        if !(0.0..=1.0).contains(&self.fill_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.fill_threshold));
        }
        Ok(())
    }
}

/// Loads and validates render options from a JSON file. Missing fields fall
/// back to the defaults, so `{}` is a valid options file.
pub fn load_options(path: impl AsRef<Path>) -> Result<RenderOptions, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let options: RenderOptions =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    options.validate()?;
    Ok(options)
}
