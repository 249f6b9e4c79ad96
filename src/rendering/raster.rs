//! Software rasterizer: an RGBA8 canvas implementing [`Surface`].
//!
//! Shapes are sampled at pixel centers (no anti-aliasing) and painting uses
//! source-over blending, so shape output is byte-for-byte deterministic and
//! can be pinned by digest in golden tests. Text goes through the system
//! fonts and is anti-aliased by glyph coverage.

use image::ImageEncoder;
use sha2::{Digest, Sha256};

use crate::rendering::layout::{Rect, TextRun};
use crate::rendering::text;
use crate::rendering::paint::Rgba;
use crate::rendering::{StrokeStyle, Surface};
use crate::{Error, Result};

pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    alpha: f64,
}

impl Canvas {
    /// A fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            alpha: 1.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba { r: self.pixels[i], g: self.pixels[i + 1], b: self.pixels[i + 2], a: self.pixels[i + 3] })
    }

    /// Encode the canvas as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        encoder
            .write_image(&self.pixels, self.width, self.height, image::ExtendedColorType::Rgba8)
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
        Ok(buf)
    }

    /// SHA-256 of dimensions and pixel data, hex-encoded
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.pixels);
        hex::encode(hasher.finalize())
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let sa = (color.a as f64 / 255.0) * self.alpha;
        if sa <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let da = self.pixels[i + 3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[i] = mix(color.r, self.pixels[i]);
        self.pixels[i + 1] = mix(color.g, self.pixels[i + 1]);
        self.pixels[i + 2] = mix(color.b, self.pixels[i + 2]);
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Pixel index span whose centers fall in `[start, end)`, clipped to `limit`
    fn span(start: f64, end: f64, limit: u32) -> std::ops::Range<i64> {
        let lo = (start - 0.5).ceil().max(0.0) as i64;
        let hi = (end - 0.5).ceil().min(limit as f64) as i64;
        lo..hi.max(lo)
    }

    /// A square brush of `size` centered on (`cx`, `cy`), used for strokes
    fn dab(&mut self, cx: f64, cy: f64, size: f64, color: Rgba) {
        let half = size / 2.0;
        for y in Self::span(cy - half, cy + half, self.height) {
            for x in Self::span(cx - half, cx + half, self.width) {
                self.blend(x, y, color);
            }
        }
    }

    /// Walk a path of `length` pixels, dabbing the "on" part of the dash pattern
    fn dashed<F>(&mut self, length: f64, style: &StrokeStyle, point_at: F)
    where
        F: Fn(f64) -> (f64, f64),
    {
        let period = style.dash_on + style.dash_off;
        let mut t = 0.0;
        while t <= length {
            let on = period <= 0.0 || t % period < style.dash_on;
            if on {
                let (x, y) = point_at(t);
                self.dab(x, y, style.width, style.color);
            }
            t += 1.0;
        }
    }
}

impl Surface for Canvas {
    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        for y in Self::span(rect.y, rect.y + rect.height, self.height) {
            for x in Self::span(rect.x, rect.x + rect.width, self.width) {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        let r2 = radius * radius;
        for y in Self::span(cy - radius, cy + radius, self.height) {
            for x in Self::span(cx - radius, cx + radius, self.width) {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn fill_text(&mut self, run: &TextRun, color: Rgba) {
        for ((line, &left), &baseline) in run.lines.iter().zip(&run.line_x).zip(&run.baselines) {
            text::draw_line(line, &run.style, left, baseline, run.x_scale, |x, y, coverage| {
                let ink = Rgba { a: (color.a as u16 * coverage as u16 / 255) as u8, ..color };
                if run.x_scale >= 1.0 {
                    self.blend(x.round() as i64, y, ink);
                } else {
                    let cell = Rect::new(x, y as f64, run.x_scale, 1.0);
                    for px in Self::span(cell.x, cell.x + cell.width, self.width) {
                        self.blend(px, y, ink);
                    }
                }
            });
        }
    }

    fn stroke_dashed_rect(&mut self, rect: Rect, style: &StrokeStyle) {
        let (w, h) = (rect.width.max(0.0), rect.height.max(0.0));
        let perimeter = 2.0 * (w + h);
        self.dashed(perimeter, style, |t| {
            if t < w {
                (rect.x + t, rect.y)
            } else if t < w + h {
                (rect.x + w, rect.y + (t - w))
            } else if t < 2.0 * w + h {
                (rect.x + w - (t - w - h), rect.y + h)
            } else {
                (rect.x, rect.y + h - (t - 2.0 * w - h))
            }
        });
    }

    fn stroke_dashed_circle(&mut self, cx: f64, cy: f64, radius: f64, style: &StrokeStyle) {
        if radius <= 0.0 {
            return;
        }
        let circumference = std::f64::consts::TAU * radius;
        self.dashed(circumference, style, |t| {
            let angle = t / radius;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        });
    }
}
