//! Per-product layout templates, expressed as data.
//!
//! Each [`DesignType`] owns a constant, ordered list of [`ElementSlot`]s. A
//! slot fixes the element id, its geometry (literal pixels or fractions of
//! the print size) and which extracted field or literal fills it. Every
//! instantiation for a type yields the same ids in the same order with the
//! same geometry; only text and colors vary.

use crate::design::{
    ColorScheme, ContactInfo, Dimensions, DesignType, Element, FontWeight, Shape, StructuredDescription, TextAlign,
    TextBlock,
};

/// Font family written on every templated text element
pub const TEMPLATE_FONT: &str = "Arial";

/// A coordinate or length resolved against the print dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    /// Literal physical pixels
    Px(f64),
    /// Fraction of the print width
    OfWidth(f64),
    /// Fraction of the print height
    OfHeight(f64),
    /// Print width minus a pixel margin
    WidthMinus(f64),
}

impl Coord {
    pub fn resolve(self, dims: &Dimensions) -> f64 {
        let w = dims.width as f64;
        let h = dims.height as f64;
        match self {
            Coord::Px(v) => v,
            Coord::OfWidth(f) => w * f,
            Coord::OfHeight(f) => h * f,
            Coord::WidthMinus(m) => w - m,
        }
    }
}

/// Which color fills an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Primary,
    Secondary,
    Accent,
    Hex(&'static str),
}

impl Paint {
    pub fn resolve(self, colors: &ColorScheme) -> String {
        match self {
            Paint::Primary => colors.primary_color.clone(),
            Paint::Secondary => colors.secondary_color.clone(),
            Paint::Accent => colors.accent_color.clone(),
            Paint::Hex(hex) => hex.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Title,
    Phone,
    Email,
    Website,
    Address,
}

impl ContactField {
    fn get(self, info: &ContactInfo) -> Option<&str> {
        match self {
            ContactField::Name => info.name.as_deref(),
            ContactField::Title => info.title.as_deref(),
            ContactField::Phone => info.phone.as_deref(),
            ContactField::Email => info.email.as_deref(),
            ContactField::Website => info.website.as_deref(),
            ContactField::Address => info.address.as_deref(),
        }
    }
}

/// Where a text element's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    CompanyName,
    Contact { field: ContactField, default: &'static str },
    /// The n-th quoted fragment of the prompt
    Quote { index: usize, default: &'static str },
    /// Quoted fragments from `start` on, one per line
    QuotesFrom { start: usize, default: &'static str },
    /// Phone and address joined by a bullet, whichever are present
    PhoneAndAddress { default: &'static str },
}

impl TextSource {
    pub fn resolve(self, description: &StructuredDescription) -> String {
        let quotes = &description.text_content;
        let contact = &description.contact_info;
        match self {
            TextSource::CompanyName => description.company_name.clone(),
            TextSource::Contact { field, default } => field.get(contact).unwrap_or(default).to_string(),
            TextSource::Quote { index, default } => quotes.get(index).map(String::as_str).unwrap_or(default).to_string(),
            TextSource::QuotesFrom { start, default } => {
                let rest = quotes.get(start..).unwrap_or_default();
                if rest.is_empty() {
                    default.to_string()
                } else {
                    rest.join("\n")
                }
            }
            TextSource::PhoneAndAddress { default } => {
                let parts: Vec<&str> = [contact.phone.as_deref(), contact.address.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|s| !s.is_empty())
                    .collect();
                if parts.is_empty() {
                    default.to_string()
                } else {
                    parts.join(" • ")
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotShape {
    Rect { x: Coord, y: Coord, width: Coord, height: Coord },
    Circle { x: Coord, y: Coord, radius: Coord },
    Text {
        x: Coord,
        y: Coord,
        source: TextSource,
        size: f64,
        weight: Option<FontWeight>,
        align: Option<TextAlign>,
        max_width: Option<Coord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSlot {
    pub id: &'static str,
    pub shape: SlotShape,
    pub fill: Paint,
    pub opacity: Option<f64>,
    pub locked: Option<bool>,
}

impl ElementSlot {
    pub fn instantiate(&self, description: &StructuredDescription, colors: &ColorScheme, dims: &Dimensions) -> Element {
        let shape = match self.shape {
            SlotShape::Rect { x, y, width, height } => Shape::Rectangle {
                x: x.resolve(dims),
                y: y.resolve(dims),
                width: width.resolve(dims),
                height: height.resolve(dims),
            },
            SlotShape::Circle { x, y, radius } => Shape::Circle {
                x: x.resolve(dims),
                y: y.resolve(dims),
                radius: radius.resolve(dims),
            },
            SlotShape::Text { x, y, source, size, weight, align, max_width } => Shape::Text(TextBlock {
                text: source.resolve(description),
                x: x.resolve(dims),
                y: y.resolve(dims),
                font_size: Some(size),
                font_weight: weight,
                font_family: Some(TEMPLATE_FONT.to_string()),
                text_align: align,
                max_width: max_width.map(|m| m.resolve(dims)),
            }),
        };
        Element {
            id: self.id.to_string(),
            shape,
            fill: self.fill.resolve(colors),
            opacity: self.opacity,
            locked: self.locked,
        }
    }
}

/// The fixed element list for one product
#[derive(Debug)]
pub struct Template {
    pub design_type: DesignType,
    pub elements: &'static [ElementSlot],
}

impl Template {
    pub fn instantiate(&self, description: &StructuredDescription, colors: &ColorScheme) -> Vec<Element> {
        let dims = self.design_type.dimensions();
        self.elements.iter().map(|slot| slot.instantiate(description, colors, &dims)).collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        self.elements.iter().map(|s| s.id)
    }
}

/// Template registered for a design type
pub fn template_for(design_type: DesignType) -> &'static Template {
    match design_type {
        DesignType::BusinessCard => &BUSINESS_CARD,
        DesignType::Flyer => &FLYER,
        DesignType::DoorHanger => &DOOR_HANGER,
    }
}

const FULL_BLEED: SlotShape = SlotShape::Rect {
    x: Coord::Px(0.0),
    y: Coord::Px(0.0),
    width: Coord::OfWidth(1.0),
    height: Coord::OfHeight(1.0),
};

const fn text(x: Coord, y: Coord, source: TextSource, size: f64, weight: Option<FontWeight>) -> SlotShape {
    SlotShape::Text { x, y, source, size, weight, align: None, max_width: None }
}

const fn centered(x: Coord, y: Coord, source: TextSource, size: f64, weight: Option<FontWeight>, max_width: Option<Coord>) -> SlotShape {
    SlotShape::Text { x, y, source, size, weight, align: Some(TextAlign::Center), max_width }
}

const fn el(id: &'static str, shape: SlotShape, fill: Paint) -> ElementSlot {
    ElementSlot { id, shape, fill, opacity: None, locked: None }
}

const BOLD: Option<FontWeight> = Some(FontWeight::Bold);
const NORMAL: Option<FontWeight> = Some(FontWeight::Normal);
const DEFAULT_PHONE: &str = "(555) 123-4567";

pub static BUSINESS_CARD: Template = Template {
    design_type: DesignType::BusinessCard,
    elements: &[
        ElementSlot { locked: Some(true), ..el("bg", FULL_BLEED, Paint::Primary) },
        ElementSlot {
            opacity: Some(0.2),
            locked: Some(false),
            ..el(
                "accent-shape",
                SlotShape::Circle { x: Coord::OfWidth(0.75), y: Coord::OfHeight(0.5), radius: Coord::OfWidth(0.35) },
                Paint::Accent,
            )
        },
        el("company-name", text(Coord::Px(40.0), Coord::Px(60.0), TextSource::CompanyName, 48.0, BOLD), Paint::Secondary),
        el(
            "name",
            text(
                Coord::Px(40.0),
                Coord::Px(250.0),
                TextSource::Contact { field: ContactField::Name, default: "Your Name" },
                32.0,
                NORMAL,
            ),
            Paint::Secondary,
        ),
        ElementSlot {
            opacity: Some(0.9),
            ..el(
                "title",
                text(
                    Coord::Px(40.0),
                    Coord::Px(300.0),
                    TextSource::Contact { field: ContactField::Title, default: "Your Title" },
                    20.0,
                    NORMAL,
                ),
                Paint::Secondary,
            )
        },
        el(
            "phone",
            text(
                Coord::Px(40.0),
                Coord::Px(400.0),
                TextSource::Contact { field: ContactField::Phone, default: DEFAULT_PHONE },
                18.0,
                None,
            ),
            Paint::Secondary,
        ),
        el(
            "email",
            text(
                Coord::Px(40.0),
                Coord::Px(440.0),
                TextSource::Contact { field: ContactField::Email, default: "email@example.com" },
                18.0,
                None,
            ),
            Paint::Secondary,
        ),
        el(
            "website",
            text(
                Coord::Px(40.0),
                Coord::Px(480.0),
                TextSource::Contact { field: ContactField::Website, default: "www.example.com" },
                18.0,
                None,
            ),
            Paint::Secondary,
        ),
    ],
};

pub static FLYER: Template = Template {
    design_type: DesignType::Flyer,
    elements: &[
        ElementSlot { locked: Some(true), ..el("bg", FULL_BLEED, Paint::Secondary) },
        ElementSlot {
            locked: Some(false),
            ..el(
                "header-bar",
                SlotShape::Rect {
                    x: Coord::Px(0.0),
                    y: Coord::Px(0.0),
                    width: Coord::OfWidth(1.0),
                    height: Coord::OfHeight(0.25),
                },
                Paint::Primary,
            )
        },
        ElementSlot {
            opacity: Some(0.3),
            locked: Some(false),
            ..el(
                "accent-shape",
                SlotShape::Circle { x: Coord::OfWidth(0.85), y: Coord::OfHeight(0.15), radius: Coord::OfWidth(0.25) },
                Paint::Accent,
            )
        },
        el(
            "title",
            SlotShape::Text {
                x: Coord::Px(100.0),
                y: Coord::Px(200.0),
                source: TextSource::Quote { index: 0, default: "Special Promotion" },
                size: 120.0,
                weight: BOLD,
                align: None,
                max_width: Some(Coord::WidthMinus(200.0)),
            },
            Paint::Secondary,
        ),
        el("company-name", text(Coord::Px(100.0), Coord::OfHeight(0.5), TextSource::CompanyName, 72.0, BOLD), Paint::Primary),
        el(
            "details",
            SlotShape::Text {
                x: Coord::Px(100.0),
                y: Coord::OfHeight(0.6),
                source: TextSource::QuotesFrom { start: 1, default: "Visit us today!" },
                size: 48.0,
                weight: None,
                align: None,
                max_width: Some(Coord::WidthMinus(200.0)),
            },
            Paint::Hex("#333333"),
        ),
        el(
            "contact",
            text(
                Coord::Px(100.0),
                Coord::OfHeight(0.85),
                TextSource::PhoneAndAddress { default: "Contact us for more info" },
                36.0,
                None,
            ),
            Paint::Hex("#666666"),
        ),
    ],
};

pub static DOOR_HANGER: Template = Template {
    design_type: DesignType::DoorHanger,
    elements: &[
        ElementSlot { locked: Some(true), ..el("bg", FULL_BLEED, Paint::Secondary) },
        ElementSlot {
            locked: Some(false),
            ..el(
                "header",
                SlotShape::Rect {
                    x: Coord::Px(0.0),
                    y: Coord::Px(0.0),
                    width: Coord::OfWidth(1.0),
                    height: Coord::OfHeight(0.15),
                },
                Paint::Primary,
            )
        },
        el(
            "company-name",
            centered(Coord::OfWidth(0.5), Coord::Px(100.0), TextSource::CompanyName, 72.0, BOLD, None),
            Paint::Secondary,
        ),
        el(
            "main-content",
            centered(
                Coord::OfWidth(0.5),
                Coord::OfHeight(0.35),
                TextSource::Quote { index: 0, default: "Professional Services" },
                56.0,
                BOLD,
                Some(Coord::WidthMinus(100.0)),
            ),
            Paint::Primary,
        ),
        el(
            "services",
            centered(
                Coord::OfWidth(0.5),
                Coord::OfHeight(0.55),
                TextSource::QuotesFrom { start: 1, default: "• Service 1\n• Service 2\n• Service 3" },
                42.0,
                None,
                Some(Coord::WidthMinus(100.0)),
            ),
            Paint::Hex("#333333"),
        ),
        el(
            "phone",
            centered(
                Coord::OfWidth(0.5),
                Coord::OfHeight(0.85),
                TextSource::Contact { field: ContactField::Phone, default: DEFAULT_PHONE },
                52.0,
                BOLD,
                None,
            ),
            Paint::Primary,
        ),
        ElementSlot {
            opacity: Some(0.2),
            locked: Some(false),
            ..el(
                "accent-circle",
                SlotShape::Circle { x: Coord::OfWidth(0.15), y: Coord::OfHeight(0.7), radius: Coord::Px(120.0) },
                Paint::Accent,
            )
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn templates_are_registered_for_every_type() {
        for t in DesignType::ALL {
            assert_eq!(template_for(t).design_type, t);
        }
    }

    #[test]
    fn template_ids_are_unique() {
        for t in DesignType::ALL {
            let ids: Vec<_> = template_for(t).ids().collect();
            let set: HashSet<_> = ids.iter().collect();
            assert_eq!(ids.len(), set.len(), "{t}");
            assert_eq!(ids[0], "bg");
        }
    }

    #[test]
    fn element_counts() {
        assert_eq!(BUSINESS_CARD.elements.len(), 8);
        assert_eq!(FLYER.elements.len(), 7);
        assert_eq!(DOOR_HANGER.elements.len(), 7);
    }

    #[test]
    fn coords_resolve_against_dimensions() {
        let d = DesignType::Flyer.dimensions();
        assert_eq!(Coord::Px(12.0).resolve(&d), 12.0);
        assert_eq!(Coord::OfWidth(0.5).resolve(&d), 1275.0);
        assert_eq!(Coord::OfHeight(0.25).resolve(&d), 825.0);
        assert_eq!(Coord::WidthMinus(200.0).resolve(&d), 2350.0);
    }

    #[test]
    fn phone_and_address_join() {
        let mut desc = crate::prompt::interpret("", DesignType::Flyer);
        let src = TextSource::PhoneAndAddress { default: "none" };
        assert_eq!(src.resolve(&desc), "none");
        desc.contact_info.phone = Some("555-123-4567".into());
        assert_eq!(src.resolve(&desc), "555-123-4567");
        desc.contact_info.address = Some("1 Elm St".into());
        assert_eq!(src.resolve(&desc), "555-123-4567 • 1 Elm St");
    }
}
