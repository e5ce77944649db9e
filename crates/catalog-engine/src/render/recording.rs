use super::{Canvas, Rgb, ShapeStyle, TextStyle};
use crate::fetch::ImageData;
use crate::layout::Cell;
use crate::types::Result;

/// One drawing call captured by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        area: Cell,
        style: ShapeStyle,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Image {
        area: Cell,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedPage {
    pub commands: Vec<DrawCommand>,
}

impl RecordedPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }

    pub fn images(&self) -> impl Iterator<Item = &Cell> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image { area, .. } => Some(area),
            _ => None,
        })
    }
}

/// Canvas that keeps every draw call in memory instead of producing a file.
///
/// Used for dry runs of a catalog layout.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pages: Vec<RecordedPage>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, command: DrawCommand) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }
}

impl Canvas for RecordingCanvas {
    type Output = Vec<RecordedPage>;

    fn begin_page(&mut self) {
        self.pages.push(RecordedPage::default());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rect(&mut self, area: Cell, style: &ShapeStyle) {
        self.push(DrawCommand::Rect {
            area,
            style: *style,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, _thickness_mm: f32) {
        self.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
    }

    fn image(&mut self, image: &ImageData, area: Cell) -> Result<()> {
        self.push(DrawCommand::Image {
            area,
            width: image.width,
            height: image.height,
        });
        Ok(())
    }

    fn finish(self) -> Result<Vec<RecordedPage>> {
        Ok(self.pages)
    }
}
