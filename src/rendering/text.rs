//! Font-backed text measurement and glyph rasterization.
//!
//! One process-wide [`FontSystem`] (system fonts) and [`SwashCache`] serve both
//! measurement and drawing, so a line is as wide on the canvas as the hit box
//! says it is.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight};

use crate::design::FontWeight;
use crate::rendering::layout::TextStyle;

struct Fonts {
    system: FontSystem,
    cache: SwashCache,
}

static FONTS: OnceLock<Mutex<Fonts>> = OnceLock::new();

const SANS_SERIF: [&str; 5] = ["Arial", "Helvetica", "Liberation Sans", "DejaVu Sans", "Noto Sans"];
const SERIF: [&str; 5] = ["Times New Roman", "Times", "Liberation Serif", "DejaVu Serif", "Noto Serif"];
const MONOSPACE: [&str; 5] = ["Courier New", "Courier", "Liberation Mono", "DejaVu Sans Mono", "Noto Sans Mono"];

fn has_family(db: &fontdb::Database, name: &str) -> bool {
    db.faces().any(|face| face.families.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)))
}

fn first_installed(db: &fontdb::Database, candidates: &[&str]) -> Option<String> {
    candidates.iter().find(|c| has_family(db, c)).map(|c| c.to_string())
}

/// Point the generic families at fonts that are actually installed
fn pick_generic_families(db: &mut fontdb::Database) {
    if let Some(name) = first_installed(db, &SANS_SERIF) {
        db.set_sans_serif_family(name);
    }
    if let Some(name) = first_installed(db, &SERIF) {
        db.set_serif_family(name);
    }
    if let Some(name) = first_installed(db, &MONOSPACE) {
        db.set_monospace_family(name);
    }
}

fn with_fonts<T>(f: impl FnOnce(&mut Fonts) -> T) -> T {
    let fonts = FONTS.get_or_init(|| {
        let mut system = FontSystem::new();
        pick_generic_families(system.db_mut());
        log::debug!("font system loaded {} faces", system.db().len());
        Mutex::new(Fonts { system, cache: SwashCache::new() })
    });
    let mut guard = fonts.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Generic family a named font falls back to when it isn't installed
fn generic_for(name: &str) -> Family<'static> {
    const MONO_HINTS: [&str; 5] = ["mono", "courier", "consolas", "menlo", "code"];
    const SERIF_HINTS: [&str; 5] = ["times", "georgia", "garamond", "palatino", "baskerville"];
    let lower = name.to_ascii_lowercase();
    if MONO_HINTS.iter().any(|m| lower.contains(m)) {
        Family::Monospace
    } else if SERIF_HINTS.iter().any(|s| lower.contains(s)) || (lower.contains("serif") && !lower.contains("sans")) {
        Family::Serif
    } else {
        Family::SansSerif
    }
}

/// Map a `fontFamily` value (first entry of a CSS-style list) onto a family
/// the font database can resolve.
fn resolve_family<'a>(system: &FontSystem, family: &'a str) -> Family<'a> {
    let name = family
        .split(',')
        .map(|f| f.trim().trim_matches('\'').trim_matches('"').trim())
        .find(|f| !f.is_empty())
        .unwrap_or("sans-serif");
    match name.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ if has_family(system.db(), name) => Family::Name(name),
        _ => generic_for(name),
    }
}

fn attrs<'a>(system: &FontSystem, style: &'a TextStyle) -> Attrs<'a> {
    let weight = match style.weight {
        FontWeight::Normal => Weight::NORMAL,
        FontWeight::Bold => Weight::BOLD,
    };
    Attrs::new().family(resolve_family(system, &style.family)).weight(weight)
}

/// Shape a single line with no wrapping
fn shape(system: &mut FontSystem, line: &str, style: &TextStyle) -> Buffer {
    let size = style.size.max(0.0) as f32;
    let mut buffer = Buffer::new(system, Metrics::new(size, size * 1.2));
    buffer.set_size(system, None, None);
    let attrs = attrs(system, style);
    buffer.set_text(system, line, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(system, false);
    buffer
}

/// Advance width of one line of text
pub fn measure_line(line: &str, style: &TextStyle) -> f64 {
    if line.is_empty() || style.size <= 0.0 {
        return 0.0;
    }
    with_fonts(|fonts| {
        let buffer = shape(&mut fonts.system, line, style);
        buffer.layout_runs().map(|run| run.line_w).fold(0.0_f32, f32::max) as f64
    })
}

/// Rasterize one line with its left edge at `left` and baseline at `baseline`.
///
/// `plot(x, y, coverage)` receives every covered pixel; x positions are
/// compressed by `x_scale` around `left`.
pub fn draw_line<F>(line: &str, style: &TextStyle, left: f64, baseline: f64, x_scale: f64, mut plot: F)
where
    F: FnMut(f64, i64, u8),
{
    if line.is_empty() || style.size <= 0.0 {
        return;
    }
    with_fonts(|fonts| {
        let Fonts { system, cache } = fonts;
        let buffer = shape(system, line, style);
        let base_y = baseline.round() as i64;
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((0.0, 0.0), 1.0);
                cache.with_pixels(system, physical.cache_key, Color::rgb(0, 0, 0), |x, y, color| {
                    let coverage = color.a();
                    if coverage == 0 {
                        return;
                    }
                    let gx = (physical.x + x) as f64;
                    let gy = base_y + (physical.y + y) as i64;
                    plot(left + gx * x_scale, gy, coverage);
                });
            }
        }
    })
}
