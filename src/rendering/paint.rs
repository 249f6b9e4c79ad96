//! Paint commands and a recording surface.
//!
//! `DisplayList` implements [`Surface`] by recording what would have been
//! drawn. Tests use it to check scaling and ordering without rasterizing.

use crate::rendering::layout::{Rect, TextRun};
use crate::rendering::{StrokeStyle, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
    pub fn from_hex(s: &str) -> Option<Rgba> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
        match hex.len() {
            3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    /// Like [`Rgba::from_hex`], but unparseable colors paint black the way a
    /// canvas keeps its default fill style.
    pub fn from_hex_or_black(s: &str) -> Rgba {
        Rgba::from_hex(s).unwrap_or_else(|| {
            log::debug!("unparseable color {:?}, painting black", s);
            Rgba::BLACK
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SetAlpha(f64),
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Rgba,
    },
    FillText {
        run: TextRun,
        color: Rgba,
    },
    StrokeRect {
        rect: Rect,
        style: StrokeStyle,
    },
    StrokeCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        style: StrokeStyle,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<PaintCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands that actually paint (alpha changes filtered out)
    pub fn draws(&self) -> impl Iterator<Item = &PaintCommand> {
        self.commands.iter().filter(|c| !matches!(c, PaintCommand::SetAlpha(_)))
    }
}

impl Surface for DisplayList {
    fn set_alpha(&mut self, alpha: f64) {
        self.commands.push(PaintCommand::SetAlpha(alpha));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgba) {
        self.commands.push(PaintCommand::FillCircle { cx, cy, radius, color });
    }

    fn fill_text(&mut self, run: &TextRun, color: Rgba) {
        self.commands.push(PaintCommand::FillText { run: run.clone(), color });
    }

    fn stroke_dashed_rect(&mut self, rect: Rect, style: &StrokeStyle) {
        self.commands.push(PaintCommand::StrokeRect { rect, style: *style });
    }

    fn stroke_dashed_circle(&mut self, cx: f64, cy: f64, radius: f64, style: &StrokeStyle) {
        self.commands.push(PaintCommand::StrokeCircle { cx, cy, radius, style: *style });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgba::from_hex("#0066CC"), Some(Rgba::rgb(0, 0x66, 0xCC)));
        assert_eq!(Rgba::from_hex("#667eea"), Some(Rgba::rgb(0x66, 0x7e, 0xea)));
        assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::from_hex("#00000080").map(|c| c.a), Some(0x80));
        assert_eq!(Rgba::from_hex("blue"), None);
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex_or_black("#zzzzzz"), Rgba::BLACK);
    }

    #[test]
    fn display_list_records_in_order() {
        let mut dl = DisplayList::new();
        dl.set_alpha(0.5);
        dl.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::WHITE);
        dl.fill_circle(1.0, 1.0, 1.0, Rgba::BLACK);
        assert_eq!(dl.commands.len(), 3);
        assert_eq!(dl.draws().count(), 2);
        match &dl.commands[0] {
            PaintCommand::SetAlpha(a) => assert_eq!(*a, 0.5),
            _ => panic!("unexpected"),
        }
    }
}
