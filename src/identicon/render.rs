//! Raster painting. The canvas starts as solid background; each filled grid
//! cell gets a smaller square inset by the cell gap, and nothing else is
//! drawn, so the output is fully determined by options, tone, and pattern.

use image::{Rgb, RgbImage};

use crate::config::{ConfigError, RenderOptions};
use crate::identicon::palette::Tone;
use crate::identicon::pattern::GridPattern;

/// Paints the identicon raster. Geometry is validated up front so a
/// degenerate gap or cell size is rejected before any allocation.
pub fn render(
    options: &RenderOptions,
    tone: Tone,
    pattern: &GridPattern,
) -> Result<RgbImage, ConfigError> {
    options.validate()?;
    if pattern.size() != options.grid_count() {
        return Err(ConfigError::GridMismatch {
            expected: options.grid_count(),
            got: pattern.size(),
        });
    }

    let background = Rgb(tone.background());
    let fill = Rgb(tone.fill());
    let mut image = RgbImage::from_pixel(options.image_size, options.image_size, background);

    for (row, col) in pattern.filled_cells() {
        let x0 = col * options.cell_size + options.cell_gap;
        let y0 = row * options.cell_size + options.cell_gap;
        let x1 = (col + 1) * options.cell_size - options.cell_gap;
        let y1 = (row + 1) * options.cell_size - options.cell_gap;
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, fill);
            }
        }
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::config::{ConfigError, RenderOptions};
    use crate::identicon::palette::Tone;
    use crate::identicon::pattern::GridPattern;
    use image::Rgb;

    fn small_options() -> RenderOptions {
        RenderOptions {
            image_size: 40,
            cell_size: 10,
            cell_gap: 2,
            fill_threshold: 0.5,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn empty_pattern_is_all_background() {
        let options = small_options();
        let pattern = GridPattern::from_seed(&[0u8; 16], options.grid_count(), 0.0);
        let image = render(&options, Tone::BlueOrange, &pattern).expect("valid geometry");
        assert_eq!(image.dimensions(), (40, 40));
        assert!(image
            .pixels()
            .all(|pixel| *pixel == Rgb(Tone::BlueOrange.background())));
    }

    #[test]
    fn filled_cell_paints_the_inset_square_only() {
        let options = small_options();
        // Threshold 1.0 fills every cell, which makes the geometry easy to probe.
        let pattern = GridPattern::from_seed(&[0u8; 16], options.grid_count(), 1.0);
        let image = render(&options, Tone::Complementary, &pattern).expect("valid geometry");

        let background = Rgb(Tone::Complementary.background());
        let fill = Rgb(Tone::Complementary.fill());

        // Center of cell (0, 0) is fill; the gap ring around it stays background.
        assert_eq!(*image.get_pixel(5, 5), fill);
        assert_eq!(*image.get_pixel(0, 0), background);
        assert_eq!(*image.get_pixel(1, 5), background);
        assert_eq!(*image.get_pixel(2, 2), fill);
        assert_eq!(*image.get_pixel(8, 8), background);

        // Same inset geometry holds in the last cell.
        assert_eq!(*image.get_pixel(35, 35), fill);
        assert_eq!(*image.get_pixel(39, 39), background);
    }

    #[test]
    fn rejects_a_pattern_sized_for_a_different_grid() {
        let options = small_options();
        let pattern = GridPattern::from_seed(&[0u8; 16], 7, 0.5);
        assert!(matches!(
            render(&options, Tone::BlueOrange, &pattern),
            Err(ConfigError::GridMismatch {
                expected: 4,
                got: 7
            })
        ));
    }

    #[test]
    fn rejects_geometry_with_no_drawable_area() {
        let options = RenderOptions {
            image_size: 40,
            cell_size: 4,
            cell_gap: 2,
            ..RenderOptions::default()
        };
        let pattern = GridPattern::from_seed(&[0u8; 16], options.grid_count(), 0.5);
        assert!(matches!(
            render(&options, Tone::BlueOrange, &pattern),
            Err(ConfigError::GapTooLarge { .. })
        ));
    }
}
