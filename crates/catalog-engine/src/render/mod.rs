//! Catalog rendering
//!
//! The renderer draws through the [`Canvas`] trait, so the page logic does
//! not depend on the PDF library:
//! - `pdf`: printpdf-backed canvas producing the final document bytes
//! - `recording`: canvas that records draw calls (dry runs, tests)
//! - `pages`: cover, index, group intro, header and card drawing
//! - `document`: the page-by-page render loop

mod document;
mod pages;
mod pdf;
mod recording;

pub use document::*;
pub use pages::index_entries_per_page;
pub use pdf::PdfCanvas;
pub use recording::*;

use crate::fetch::ImageData;
use crate::layout::Cell;
use crate::types::Result;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Horizontal anchoring of a text run relative to its x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub fn new(size_pt: f32, color: Rgb) -> Self {
        Self {
            size_pt,
            bold: false,
            color,
            align: Align::Left,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

/// Paint of a rectangle: fill, outline or both
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub thickness_mm: f32,
    pub radius_mm: f32,
}

impl ShapeStyle {
    pub fn filled(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            thickness_mm: 0.0,
            radius_mm: 0.0,
        }
    }

    pub fn outlined(mut self, color: Rgb, thickness_mm: f32) -> Self {
        self.stroke = Some(color);
        self.thickness_mm = thickness_mm;
        self
    }

    pub fn rounded(mut self, radius_mm: f32) -> Self {
        self.radius_mm = radius_mm;
        self
    }
}

/// Drawing surface of the renderer.
///
/// Coordinates are millimetres from the top-left corner of the current page;
/// text y coordinates are baselines. Drawing before the first
/// [`Canvas::begin_page`] is a no-op.
pub trait Canvas {
    /// What the finished document is handed back as
    type Output: Send + 'static;

    fn begin_page(&mut self);

    fn page_count(&self) -> usize;

    fn rect(&mut self, area: Cell, style: &ShapeStyle);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, thickness_mm: f32);

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// Draw `image` stretched to `area`; fails when the canvas cannot embed it
    fn image(&mut self, image: &ImageData, area: Cell) -> Result<()>;

    /// Serialize the document
    fn finish(self) -> Result<Self::Output>;
}
