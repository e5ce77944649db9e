use super::{Align, Canvas, Rgb, ShapeStyle, TextStyle};
use crate::constants::{BEZIER_CIRCLE_FACTOR, mm_to_pt};
use crate::fetch::ImageData;
use crate::layout::Cell;
use crate::text::text_width_mm;
use crate::types::{CatalogError, Result};
use printpdf::*;

/// Canvas that collects printpdf operations, one `Vec<Op>` per page.
///
/// The `PdfDocument` itself is only built in [`Canvas::finish`], so the
/// canvas can move between threads while pages are drawn.
pub struct PdfCanvas {
    title: String,
    page_width_mm: f32,
    page_height_mm: f32,
    pages: Vec<Vec<Op>>,
    images: Vec<(XObjectId, RawImage)>,
}

impl PdfCanvas {
    pub fn new(title: &str, page_width_mm: f32, page_height_mm: f32) -> Self {
        Self {
            title: title.to_string(),
            page_width_mm,
            page_height_mm,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    fn ops(&mut self) -> Option<&mut Vec<Op>> {
        self.pages.last_mut()
    }

    /// Convert top-left millimetres to a PDF point
    fn point(&self, x_mm: f32, y_mm: f32) -> Point {
        Point {
            x: Mm(x_mm).into_pt(),
            y: Mm(self.page_height_mm - y_mm).into_pt(),
        }
    }

    fn rect_outline(&self, area: Cell, radius: f32) -> Vec<LinePoint> {
        let left = area.x;
        let right = area.right();
        let top = area.y;
        let bottom = area.bottom();

        let corner = |x: f32, y: f32| LinePoint {
            p: self.point(x, y),
            bezier: false,
        };
        let control = |x: f32, y: f32| LinePoint {
            p: self.point(x, y),
            bezier: true,
        };

        let r = radius.min(area.width / 2.0).min(area.height / 2.0);
        if r <= 0.0 {
            return vec![
                corner(left, bottom),
                corner(right, bottom),
                corner(right, top),
                corner(left, top),
            ];
        }

        let k = BEZIER_CIRCLE_FACTOR * r;
        vec![
            corner(left + r, bottom),
            corner(right - r, bottom),
            control(right - r + k, bottom),
            control(right, bottom - r + k),
            corner(right, bottom - r),
            corner(right, top + r),
            control(right, top + r - k),
            control(right - r + k, top),
            corner(right - r, top),
            corner(left + r, top),
            control(left + r - k, top),
            control(left, top + r - k),
            corner(left, top + r),
            corner(left, bottom - r),
            control(left, bottom - r + k),
            control(left + r - k, bottom),
            corner(left + r, bottom),
        ]
    }
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn builtin_font(bold: bool) -> BuiltinFont {
    if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

impl Canvas for PdfCanvas {
    type Output = Vec<u8>;

    fn begin_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rect(&mut self, area: Cell, style: &ShapeStyle) {
        let mode = match (style.fill, style.stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            (None, Some(_)) => PaintMode::Stroke,
            (None, None) => return,
        };
        let points = self.rect_outline(area, style.radius_mm);

        let Some(ops) = self.ops() else { return };
        if let Some(fill) = style.fill {
            ops.push(Op::SetFillColor {
                col: pdf_color(fill),
            });
        }
        if let Some(stroke) = style.stroke {
            ops.push(Op::SetOutlineColor {
                col: pdf_color(stroke),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(mm_to_pt(style.thickness_mm)),
            });
        }
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, thickness_mm: f32) {
        let points = vec![
            LinePoint {
                p: self.point(from.0, from.1),
                bezier: false,
            },
            LinePoint {
                p: self.point(to.0, to.1),
                bezier: false,
            },
        ];

        let Some(ops) = self.ops() else { return };
        ops.push(Op::SetOutlineColor {
            col: pdf_color(color),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(mm_to_pt(thickness_mm)),
        });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        if text.is_empty() {
            return;
        }

        let x = match style.align {
            Align::Left => x,
            Align::Center => x - text_width_mm(text, style.size_pt, style.bold) / 2.0,
            Align::Right => x - text_width_mm(text, style.size_pt, style.bold),
        };
        let pos = self.point(x, y);
        let font = builtin_font(style.bold);

        let Some(ops) = self.ops() else { return };
        ops.push(Op::SetFillColor {
            col: pdf_color(style.color),
        });
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor { pos });
        ops.push(Op::SetFontSizeBuiltinFont {
            font,
            size: Pt(style.size_pt),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        });
        ops.push(Op::EndTextSection);
    }

    fn image(&mut self, image: &ImageData, area: Cell) -> Result<()> {
        if self.pages.is_empty() {
            return Ok(());
        }

        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&image.bytes, &mut warnings)
            .map_err(|e| CatalogError::Pdf(format!("Failed to decode image: {}", e)))?;
        if raw.width == 0 || raw.height == 0 {
            return Err(CatalogError::Pdf("Image has no pixels".to_string()));
        }

        let scale_x = mm_to_pt(area.width) / raw.width as f32;
        let scale_y = mm_to_pt(area.height) / raw.height as f32;
        let origin = self.point(area.x, area.bottom());
        let id = XObjectId::new();
        self.images.push((id.clone(), raw));

        if let Some(ops) = self.ops() {
            ops.push(Op::UseXobject {
                id,
                transform: XObjectTransform {
                    translate_x: Some(origin.x),
                    translate_y: Some(origin.y),
                    scale_x: Some(scale_x),
                    scale_y: Some(scale_y),
                    rotate: None,
                    dpi: Some(72.0),
                },
            });
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let width = Mm(self.page_width_mm);
        let height = Mm(self.page_height_mm);

        let mut doc = PdfDocument::new(&self.title);
        for (id, raw) in self.images {
            doc.resources.xobjects.map.insert(id, XObject::Image(raw));
        }
        for ops in self.pages {
            doc.pages.push(PdfPage::new(width, height, ops));
        }

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("PDF serialization produced {} warnings", warnings.len());
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_canvas_draws_nothing() {
        let mut canvas = PdfCanvas::new("test", 210.0, 297.0);
        canvas.text("ignored", 10.0, 10.0, &TextStyle::new(10.0, Rgb(0, 0, 0)));
        canvas.rect(
            Cell::new(0.0, 0.0, 10.0, 10.0),
            &ShapeStyle::filled(Rgb(0, 0, 0)),
        );
        assert_eq!(canvas.page_count(), 0);
    }

    #[test]
    fn test_point_flips_y_axis() {
        let canvas = PdfCanvas::new("test", 210.0, 297.0);
        let p = canvas.point(0.0, 297.0);
        assert!(p.y.0.abs() < 0.001);
        let top = canvas.point(0.0, 0.0);
        assert!((top.y.0 - mm_to_pt(297.0)).abs() < 0.01);
    }

    #[test]
    fn test_rounded_outline_is_closed() {
        let canvas = PdfCanvas::new("test", 210.0, 297.0);
        let points = canvas.rect_outline(Cell::new(10.0, 10.0, 50.0, 20.0), 3.0);
        assert_eq!(points.first().map(|p| p.p), points.last().map(|p| p.p));
        assert_eq!(points.iter().filter(|p| p.bezier).count(), 8);
    }

    #[test]
    fn test_finish_produces_pdf_bytes() {
        let mut canvas = PdfCanvas::new("test", 210.0, 297.0);
        canvas.begin_page();
        canvas.text("Hello", 20.0, 20.0, &TextStyle::new(12.0, Rgb(0, 0, 0)).bold());
        canvas.begin_page();
        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    fn assert_send<T: Send + 'static>(_: &T) {}

    #[test]
    fn test_canvas_with_image_is_send() {
        let img = ::image::RgbImage::from_pixel(4, 4, ::image::Rgb([200, 10, 10]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), ::image::ImageFormat::Png)
            .unwrap();
        let data = crate::fetch::decode_image_data(png).unwrap();

        let mut canvas = PdfCanvas::new("test", 210.0, 297.0);
        canvas.begin_page();
        canvas
            .image(&data, Cell::new(10.0, 10.0, 40.0, 40.0))
            .unwrap();
        assert_eq!(canvas.images.len(), 1);
        assert_send(&canvas);

        let bytes = std::thread::spawn(move || canvas.finish().unwrap())
            .join()
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
