//! Scene renderer
//!
//! Draws a [`DesignDocument`] onto any [`Surface`] and answers "which element
//! is under the pointer". Geometry is stored in physical units; a [`View`]
//! carries the scale (physical to surface pixels) and the editor zoom, which
//! only matters for hit-testing since zoom is applied on top of the preview.

pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use crate::design::{DesignDocument, Dimensions, Shape};
use crate::Result;
use layout::{text_bounds, text_layout, Rect, TextRun, TextStyle};
use paint::Rgba;
use raster::Canvas;

/// Longest side of a library thumbnail, in pixels
pub const THUMBNAIL_SIZE: f64 = 200.0;

/// Outline style for dashed strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f64,
    pub dash_on: f64,
    pub dash_off: f64,
}

impl StrokeStyle {
    /// The editor's selection outline: #667eea, 3 px, 5/5 dashes
    pub const SELECTION: StrokeStyle = StrokeStyle {
        color: Rgba::rgb(0x66, 0x7e, 0xea),
        width: 3.0,
        dash_on: 5.0,
        dash_off: 5.0,
    };
}

/// A 2D drawing target. Coordinates are surface pixels.
pub trait Surface {
    /// Global alpha applied to every subsequent paint
    fn set_alpha(&mut self, alpha: f64);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba);

    fn fill_text(&mut self, run: &TextRun, color: Rgba);

    fn stroke_dashed_rect(&mut self, rect: Rect, style: &StrokeStyle);

    fn stroke_dashed_circle(&mut self, cx: f64, cy: f64, radius: f64, style: &StrokeStyle);

    /// Advance width of one line of text in `style`
    fn measure_text(&self, line: &str, style: &TextStyle) -> f64 {
        text::measure_line(line, style)
    }
}

/// Mapping from physical units to surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Physical unit -> surface pixel
    pub scale: f64,
    /// Editor zoom on top of the scale (1.0 = none)
    pub zoom: f64,
}

impl View {
    pub const fn new(scale: f64, zoom: f64) -> Self {
        Self { scale, zoom }
    }

    /// The on-screen editor preview (`displayWidth / width`)
    pub fn preview(dims: &Dimensions) -> Self {
        Self::new(dims.preview_scale(), 1.0)
    }

    /// Print resolution
    pub fn export() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Library thumbnail: the preview fitted into a [`THUMBNAIL_SIZE`] box
    pub fn thumbnail(dims: &Dimensions) -> Self {
        let longest = dims.display_width.max(dims.display_height).max(1) as f64;
        let thumb_scale = THUMBNAIL_SIZE / longest;
        let scale = if dims.width == 0 { thumb_scale } else { dims.display_width as f64 * thumb_scale / dims.width as f64 };
        Self::new(scale, 1.0)
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Self { zoom, ..self }
    }

    /// Surface size in whole pixels for a document of `dims`
    pub fn surface_size(&self, dims: &Dimensions) -> (u32, u32) {
        let w = (dims.width as f64 * self.scale).round().max(1.0) as u32;
        let h = (dims.height as f64 * self.scale).round().max(1.0) as u32;
        (w, h)
    }
}

/// Paint every element in order, outlining `selected` if present.
///
/// Output depends only on the document, the view scale and the selection.
pub fn render<S: Surface + ?Sized>(surface: &mut S, doc: &DesignDocument, view: &View, selected: Option<&str>) {
    let scale = view.scale;
    for element in &doc.elements {
        surface.set_alpha(element.opacity.unwrap_or(1.0));
        let color = Rgba::from_hex_or_black(&element.fill);
        let is_selected = selected == Some(element.id.as_str());

        match &element.shape {
            Shape::Rectangle { x, y, width, height } => {
                let rect = Rect::new(*x, *y, *width, *height).scaled(scale);
                surface.fill_rect(rect, color);
                if is_selected {
                    surface.stroke_dashed_rect(rect, &StrokeStyle::SELECTION);
                }
            }
            Shape::Circle { x, y, radius } => {
                let (cx, cy, r) = (x * scale, y * scale, radius * scale);
                surface.fill_circle(cx, cy, r, color);
                if is_selected {
                    surface.stroke_dashed_circle(cx, cy, r, &StrokeStyle::SELECTION);
                }
            }
            Shape::Text(block) => {
                let run = text_layout(block, scale, |line, style| surface.measure_text(line, style));
                surface.fill_text(&run, color);
                if is_selected {
                    let bounds = text_bounds(block, scale, |line, style| surface.measure_text(line, style));
                    surface.stroke_dashed_rect(bounds.scaled(scale), &StrokeStyle::SELECTION);
                }
            }
        }

        surface.set_alpha(1.0);
    }
}

/// Topmost unlocked element under the pointer at surface pixel (`px`, `py`).
pub fn hit_test(doc: &DesignDocument, px: f64, py: f64, view: &View) -> Option<String> {
    let factor = view.zoom * view.scale;
    if factor <= 0.0 {
        return None;
    }
    let (x, y) = (px / factor, py / factor);

    doc.elements
        .iter()
        .rev()
        .filter(|e| !e.is_locked())
        .find(|e| match &e.shape {
            Shape::Rectangle { x: rx, y: ry, width, height } => Rect::new(*rx, *ry, *width, *height).contains(x, y),
            Shape::Circle { x: cx, y: cy, radius } => {
                let (dx, dy) = (x - cx, y - cy);
                (dx * dx + dy * dy).sqrt() <= *radius
            }
            Shape::Text(block) => text_bounds(block, view.scale, text::measure_line).contains(x, y),
        })
        .map(|e| e.id.clone())
}

/// An encoded raster of a document
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl RenderedImage {
    fn from_canvas(canvas: &Canvas) -> Result<Self> {
        Ok(Self { width: canvas.width(), height: canvas.height(), png_data: canvas.encode_png()? })
    }
}

/// Rasterize `doc` for `view` without encoding
pub fn rasterize(doc: &DesignDocument, view: &View, selected: Option<&str>) -> Canvas {
    let (w, h) = view.surface_size(&doc.dimensions);
    let mut canvas = Canvas::new(w, h);
    render(&mut canvas, doc, view, selected);
    canvas
}

/// Full print-resolution PNG, no selection outline
pub fn export_png(doc: &DesignDocument) -> Result<RenderedImage> {
    let canvas = rasterize(doc, &View::export(), None);
    log::debug!("exported {}x{} {}", canvas.width(), canvas.height(), doc.design_type);
    RenderedImage::from_canvas(&canvas)
}

/// Editor preview PNG, optionally outlining the selected element
pub fn render_preview(doc: &DesignDocument, selected: Option<&str>) -> Result<RenderedImage> {
    RenderedImage::from_canvas(&rasterize(doc, &View::preview(&doc.dimensions), selected))
}

/// Small PNG for the library listing
pub fn thumbnail(doc: &DesignDocument) -> Result<RenderedImage> {
    RenderedImage::from_canvas(&rasterize(doc, &View::thumbnail(&doc.dimensions), None))
}
