//! Card placement within grid cells
//!
//! A product card is split into an image area on top and a text area below
//! it. Images are scaled to fit the image area without cropping and centred.

use super::Cell;

/// Padding between the card border and the image area
pub const CARD_PADDING_MM: f32 = 2.0;

/// Regions of one product card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    /// The whole card, equal to the grid cell
    pub card: Cell,
    /// Area the image (or placeholder) is fitted into
    pub image_area: Cell,
    /// Y coordinate where the code badge starts
    pub text_top: f32,
}

/// Split a cell into image and text regions.
///
/// `text_area_height` is reserved at the bottom of the card for the code
/// badge and the item name.
pub fn card_layout(cell: Cell, text_area_height: f32) -> CardLayout {
    let image_height = cell.height - text_area_height;
    let image_area = Cell::new(
        cell.x + CARD_PADDING_MM,
        cell.y + CARD_PADDING_MM,
        cell.width - 2.0 * CARD_PADDING_MM,
        image_height - CARD_PADDING_MM,
    );

    CardLayout {
        card: cell,
        image_area,
        text_top: cell.y + image_height + 1.0,
    }
}

/// Fit an image of `image_width` x `image_height` pixels inside `area`,
/// preserving its aspect ratio, and centre it.
///
/// Wider-than-area images are fitted to the width, all others to the height.
pub fn fit_image(image_width: u32, image_height: u32, area: Cell) -> Cell {
    if image_width == 0 || image_height == 0 {
        return area;
    }

    let image_aspect = image_width as f32 / image_height as f32;
    let area_aspect = area.width / area.height;

    let (draw_width, draw_height) = if image_aspect > area_aspect {
        (area.width, area.width / image_aspect)
    } else {
        (area.height * image_aspect, area.height)
    };

    Cell::new(
        area.x + (area.width - draw_width) / 2.0,
        area.y + (area.height - draw_height) / 2.0,
        draw_width,
        draw_height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_card_layout_regions() {
        let layout = card_layout(Cell::new(8.0, 33.0, 62.0, 61.0), 18.0);

        assert_eq!(layout.image_area, Cell::new(10.0, 35.0, 58.0, 41.0));
        assert!(approx(layout.text_top, 33.0 + 43.0 + 1.0));
        assert!(layout.card.contains(&layout.image_area));
    }

    #[test]
    fn test_wide_image_fits_width() {
        let area = Cell::new(0.0, 0.0, 60.0, 40.0);
        let fitted = fit_image(1200, 300, area);

        assert!(approx(fitted.width, 60.0));
        assert!(approx(fitted.height, 15.0));
        // vertically centred
        assert!(approx(fitted.y, 12.5));
        assert!(area.contains(&fitted));
    }

    #[test]
    fn test_tall_image_fits_height() {
        let area = Cell::new(10.0, 10.0, 60.0, 40.0);
        let fitted = fit_image(400, 800, area);

        assert!(approx(fitted.height, 40.0));
        assert!(approx(fitted.width, 20.0));
        // horizontally centred
        assert!(approx(fitted.x, 10.0 + 20.0));
        assert!(area.contains(&fitted));
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let area = Cell::new(0.0, 0.0, 58.0, 41.0);
        for (w, h) in [(640, 480), (100, 1000), (1000, 100), (58, 41), (1, 1)] {
            let fitted = fit_image(w, h, area);
            let expected = w as f32 / h as f32;
            assert!((fitted.width / fitted.height - expected).abs() < 0.01);
            assert!(area.contains(&fitted));
        }
    }

    #[test]
    fn test_degenerate_image_uses_whole_area() {
        let area = Cell::new(0.0, 0.0, 58.0, 41.0);
        assert_eq!(fit_image(0, 10, area), area);
    }
}
