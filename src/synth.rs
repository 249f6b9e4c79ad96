//! Layout synthesizer: structured description + design type -> document.

use crate::design::{ColorScheme, DesignDocument, DesignType, StructuredDescription};
use crate::template::template_for;

pub const DEFAULT_PRIMARY: &str = "#667eea";
pub const DEFAULT_SECONDARY: &str = "#FFFFFF";

/// Map a palette onto primary/secondary/accent by position.
///
/// Missing entries fall back to [`DEFAULT_PRIMARY`], [`DEFAULT_SECONDARY`] and
/// the resolved primary respectively.
pub fn resolve_colors(palette: &[String]) -> ColorScheme {
    let primary = palette.first().map(String::as_str).unwrap_or(DEFAULT_PRIMARY).to_string();
    let secondary = palette.get(1).map(String::as_str).unwrap_or(DEFAULT_SECONDARY).to_string();
    let accent = palette.get(2).cloned().unwrap_or_else(|| primary.clone());
    ColorScheme { primary_color: primary, secondary_color: secondary, accent_color: accent }
}

/// Build an unsaved document (no id, no timestamps) for `design_type`.
pub fn synthesize(description: &StructuredDescription, design_type: DesignType) -> DesignDocument {
    let colors = resolve_colors(&description.colors);
    let template = template_for(design_type);
    let elements = template.instantiate(description, &colors);
    log::debug!("synthesized {} with {} elements", design_type, elements.len());

    DesignDocument {
        id: None,
        design_type,
        dimensions: design_type.dimensions(),
        colors,
        elements,
        metadata: Some(description.clone()),
        created_at: None,
        updated_at: None,
    }
}
