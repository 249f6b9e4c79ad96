//! Design document model
//!
//! A [`DesignDocument`] is the persisted unit: a design type, its fixed
//! print/preview dimensions, a three-color scheme and an ordered list of
//! drawable [`Element`]s. All element geometry is stored in physical (print)
//! units; scaling for preview or thumbnails is the renderer's job.
//!
//! The JSON shape mirrors what the design API stores on disk:
//!
//! ```json
//! { "type": "business-card",
//!   "dimensions": { "width": 1050, "height": 600, "displayWidth": 700, "displayHeight": 400 },
//!   "colors": { "primaryColor": "#0066CC", "secondaryColor": "#FFFFFF", "accentColor": "#0066CC" },
//!   "elements": [ { "id": "bg", "type": "rectangle", "x": 0, "y": 0, "width": 1050, "height": 600,
//!                   "fill": "#0066CC", "locked": true } ] }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default font size for text elements that don't carry one
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Default font family for text elements that don't carry one
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
/// Range the editor accepts for font sizes
pub const FONT_SIZE_RANGE: (f64, f64) = (10.0, 200.0);

/// The closed set of printable products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignType {
    /// 3.5" x 2"
    BusinessCard,
    /// 8.5" x 11"
    Flyer,
    /// 4.25" x 11"
    DoorHanger,
}

impl DesignType {
    pub const ALL: [DesignType; 3] = [DesignType::BusinessCard, DesignType::Flyer, DesignType::DoorHanger];

    /// Wire name (`business-card`, `flyer`, `door-hanger`)
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignType::BusinessCard => "business-card",
            DesignType::Flyer => "flyer",
            DesignType::DoorHanger => "door-hanger",
        }
    }

    /// Human-readable label used by the library view
    pub fn label(&self) -> &'static str {
        match self {
            DesignType::BusinessCard => "Business Card",
            DesignType::Flyer => "Flyer",
            DesignType::DoorHanger => "Door Hanger",
        }
    }

    /// Fixed print and preview size for this product (print size at 300 DPI).
    pub fn dimensions(&self) -> Dimensions {
        match self {
            DesignType::BusinessCard => Dimensions::new(1050, 600, 700, 400),
            DesignType::Flyer => Dimensions::new(2550, 3300, 612, 792),
            DesignType::DoorHanger => Dimensions::new(1275, 3300, 425, 1100),
        }
    }
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesignType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DesignType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidDesignType(s.to_string()))
    }
}

/// Physical pixel size plus the on-screen preview size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub display_width: u32,
    pub display_height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, display_width: u32, display_height: u32) -> Self {
        Self { width, height, display_width, display_height }
    }

    /// Physical-to-preview scale factor (`displayWidth / width`)
    pub fn preview_scale(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        self.display_width as f64 / self.width as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// A run of text anchored at its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
}

impl TextBlock {
    pub fn size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn weight(&self) -> FontWeight {
        self.font_weight.unwrap_or_default()
    }

    pub fn family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    pub fn align(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }
}

/// Geometry of a primitive, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned box, top-left origin
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Disk, center origin
    Circle { x: f64, y: f64, radius: f64 },
    Text(TextBlock),
}

/// One drawable primitive of a design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(flatten)]
    pub shape: Shape,
    pub fill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl Element {
    pub fn is_locked(&self) -> bool {
        self.locked.unwrap_or(false)
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    fn apply(&mut self, patch: &ElementPatch) {
        if let Some(fill) = &patch.fill {
            self.fill = fill.clone();
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = Some(opacity.clamp(0.0, 1.0));
        }
        if let Shape::Text(t) = &mut self.shape {
            if let Some(text) = &patch.text {
                t.text = text.clone();
            }
            if let Some(size) = patch.font_size {
                t.font_size = Some(size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1));
            }
            if let Some(weight) = patch.font_weight {
                t.font_weight = Some(weight);
            }
        }
    }
}

/// A per-field edit routed through [`DesignDocument::update_element`].
///
/// Text-only fields are ignored when the target is a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl ElementPatch {
    pub fn fill(color: impl Into<String>) -> Self {
        Self { fill: Some(color.into()), ..Default::default() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), ..Default::default() }
    }

    pub fn font_size(size: f64) -> Self {
        Self { font_size: Some(size), ..Default::default() }
    }

    pub fn font_weight(weight: FontWeight) -> Self {
        Self { font_weight: Some(weight), ..Default::default() }
    }

    pub fn opacity(opacity: f64) -> Self {
        Self { opacity: Some(opacity), ..Default::default() }
    }
}

/// Contact fields pulled out of a prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Output of the prompt interpreter, kept on the document as `metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDescription {
    pub design_type: DesignType,
    /// Hex palette, 1..=3 entries
    pub colors: Vec<String>,
    /// Every quoted fragment of the prompt, in prompt order
    pub text_content: Vec<String>,
    pub company_name: String,
    pub contact_info: ContactInfo,
    pub raw_prompt: String,
}

/// The persisted unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub design_type: DesignType,
    pub dimensions: Dimensions,
    pub colors: ColorScheme,
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StructuredDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DesignDocument {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Apply a per-field edit to the element with `id`.
    ///
    /// Locked and unknown elements are rejected and the document is left untouched.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Result<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))?;
        if element.is_locked() {
            return Err(Error::ElementLocked(id.to_string()));
        }
        element.apply(patch);
        Ok(())
    }

    /// Ids in paint order
    pub fn element_ids(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn has_unique_ids(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.elements.iter().all(|e| seen.insert(e.id.as_str()))
    }

    /// Export file name, e.g. `flyer-1700000000000.png`
    pub fn export_file_name(&self, now: DateTime<Utc>) -> String {
        format!("{}-{}.png", self.design_type, now.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DesignDocument {
        DesignDocument {
            id: None,
            design_type: DesignType::BusinessCard,
            dimensions: DesignType::BusinessCard.dimensions(),
            colors: ColorScheme {
                primary_color: "#0066CC".into(),
                secondary_color: "#FFFFFF".into(),
                accent_color: "#0066CC".into(),
            },
            elements: vec![
                Element {
                    id: "bg".into(),
                    shape: Shape::Rectangle { x: 0.0, y: 0.0, width: 1050.0, height: 600.0 },
                    fill: "#0066CC".into(),
                    opacity: None,
                    locked: Some(true),
                },
                Element {
                    id: "company-name".into(),
                    shape: Shape::Text(TextBlock {
                        text: "Acme".into(),
                        x: 40.0,
                        y: 60.0,
                        font_size: Some(48.0),
                        font_weight: Some(FontWeight::Bold),
                        font_family: Some("Arial".into()),
                        text_align: None,
                        max_width: None,
                    }),
                    fill: "#FFFFFF".into(),
                    opacity: None,
                    locked: None,
                },
            ],
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn design_type_parses_wire_names() {
        assert_eq!("flyer".parse::<DesignType>().unwrap(), DesignType::Flyer);
        assert_eq!("door-hanger".parse::<DesignType>().unwrap(), DesignType::DoorHanger);
        let err = "poster".parse::<DesignType>().unwrap_err();
        assert!(matches!(err, Error::InvalidDesignType(ref s) if s == "poster"));
    }

    #[test]
    fn element_json_uses_type_tag_and_camel_case() {
        let doc = sample();
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["type"], "business-card");
        assert_eq!(v["dimensions"]["displayWidth"], 700);
        assert_eq!(v["elements"][0]["type"], "rectangle");
        assert_eq!(v["elements"][0]["locked"], true);
        assert_eq!(v["elements"][1]["fontSize"], 48.0);
        assert_eq!(v["elements"][1]["fontWeight"], "bold");
        assert!(v["elements"][1].get("opacity").is_none());
        assert!(v.get("id").is_none());
    }

    #[test]
    fn element_json_accepts_integer_geometry() {
        let raw = r##"{"id":"dot","type":"circle","x":10,"y":20,"radius":5,"fill":"#000000","opacity":0.5}"##;
        let el: Element = serde_json::from_str(raw).unwrap();
        assert_eq!(el.shape, Shape::Circle { x: 10.0, y: 20.0, radius: 5.0 });
        assert_eq!(el.opacity, Some(0.5));
        assert!(!el.is_locked());
    }

    #[test]
    fn update_element_patches_text_fields() {
        let mut doc = sample();
        doc.update_element("company-name", &ElementPatch::text("Globex")).unwrap();
        doc.update_element("company-name", &ElementPatch::font_size(500.0)).unwrap();
        let t = doc.element("company-name").and_then(Element::as_text).unwrap();
        assert_eq!(t.text, "Globex");
        assert_eq!(t.font_size, Some(200.0));
    }

    #[test]
    fn update_element_rejects_locked_and_unknown() {
        let mut doc = sample();
        let before = doc.clone();
        assert!(matches!(
            doc.update_element("bg", &ElementPatch::fill("#000000")),
            Err(Error::ElementLocked(_))
        ));
        assert!(matches!(
            doc.update_element("nope", &ElementPatch::fill("#000000")),
            Err(Error::ElementNotFound(_))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn preview_scale_matches_table() {
        let d = DesignType::Flyer.dimensions();
        assert!((d.preview_scale() - 612.0 / 2550.0).abs() < 1e-12);
    }
}
