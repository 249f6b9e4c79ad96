//! Geometry and text metrics shared by rendering and hit-testing.
//!
//! Everything here works in physical units unless a function takes a scale.
//! Render and hit-test both lay text out through [`text_layout`] with the same
//! measurement, so a text element is hit exactly where it is drawn.

use crate::design::{FontWeight, TextAlign, TextBlock};

/// Horizontal padding around a text box, in surface pixels
pub const TEXT_PAD_X: f64 = 5.0;
/// How far below the baseline a text box reaches, in surface pixels
pub const TEXT_DESCENT: f64 = 10.0;
/// Baseline-to-baseline distance as a multiple of the font size
pub const LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive containment, matching the editor's click test
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn scaled(&self, scale: f64) -> Rect {
        Rect::new(self.x * scale, self.y * scale, self.width * scale, self.height * scale)
    }
}

/// Font selection for a run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: f64,
    pub weight: FontWeight,
}

/// Positioned text ready for a surface: one baseline per line
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub lines: Vec<String>,
    /// Left edge of each line (alignment applied)
    pub line_x: Vec<f64>,
    /// Baseline of each line
    pub baselines: Vec<f64>,
    pub style: TextStyle,
    /// Horizontal squeeze applied when the text exceeds `maxWidth` (1.0 = none)
    pub x_scale: f64,
    /// Widest line after squeezing
    pub width: f64,
}

impl TextRun {
    pub fn size(&self) -> f64 {
        self.style.size
    }
}

/// Lay out a text block at `scale` (1.0 = physical units), measuring each
/// line with `measure`.
pub fn text_layout<M>(block: &TextBlock, scale: f64, measure: M) -> TextRun
where
    M: Fn(&str, &TextStyle) -> f64,
{
    let style = TextStyle {
        family: block.family().to_string(),
        size: block.size() * scale,
        weight: block.weight(),
    };
    let lines: Vec<String> = block.text.split('\n').map(str::to_string).collect();
    let widths: Vec<f64> = lines.iter().map(|l| measure(l, &style)).collect();
    let natural = widths.iter().copied().fold(0.0_f64, f64::max);

    let x_scale = match block.max_width {
        Some(max) if max > 0.0 && natural > max * scale => (max * scale) / natural,
        _ => 1.0,
    };

    let x = block.x * scale;
    let y = block.y * scale;
    let line_x = widths
        .iter()
        .map(|w| match block.align() {
            TextAlign::Left => x,
            TextAlign::Center => x - w * x_scale / 2.0,
        })
        .collect();
    let baselines = (0..lines.len()).map(|i| y + i as f64 * style.size * LINE_HEIGHT).collect();

    TextRun {
        lines,
        line_x,
        baselines,
        x_scale,
        width: natural * x_scale,
        style,
    }
}

/// Selection/hit box of a text block in physical units.
///
/// The box spans the widest line padded by [`TEXT_PAD_X`], from one em above
/// the first baseline to [`TEXT_DESCENT`] below the last; paddings are in
/// surface pixels and therefore divided by `scale`.
pub fn text_bounds<M>(block: &TextBlock, scale: f64, measure: M) -> Rect
where
    M: Fn(&str, &TextStyle) -> f64,
{
    let run = text_layout(block, 1.0, measure);
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let left = match block.align() {
        TextAlign::Left => block.x,
        TextAlign::Center => block.x - run.width / 2.0,
    };
    let last_baseline = run.baselines.last().copied().unwrap_or(block.y);
    let pad = TEXT_PAD_X / scale;
    let top = block.y - run.size();
    Rect::new(left - pad, top, run.width + 2.0 * pad, last_baseline + TEXT_DESCENT / scale - top)
}
