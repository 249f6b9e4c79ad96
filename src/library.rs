//! Saved-design listing: one card per stored document.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::design::DesignDocument;
use crate::rendering;
use crate::Result;

/// A stored design as the library shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    /// "Business Card", "Flyer", "Door Hanger"
    pub type_label: String,
    pub company_name: Option<String>,
    pub created: Option<String>,
    /// Only set when the design was changed after it was created
    pub updated: Option<String>,
    /// `data:image/png;base64,...`
    pub thumbnail: String,
}

impl LibraryEntry {
    pub fn from_document(doc: &DesignDocument) -> Result<Self> {
        let updated = match (doc.created_at, doc.updated_at) {
            (Some(c), Some(u)) if c != u => Some(format_date(u)),
            (None, Some(u)) => Some(format_date(u)),
            _ => None,
        };
        Ok(Self {
            id: doc.id.clone().unwrap_or_default(),
            type_label: doc.design_type.label().to_string(),
            company_name: doc
                .metadata
                .as_ref()
                .map(|m| m.company_name.clone())
                .filter(|name| !name.is_empty()),
            created: doc.created_at.map(format_date),
            updated,
            thumbnail: thumbnail_data_url(doc)?,
        })
    }
}

/// `Oct 5, 2025` style date used on library cards
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Render the library thumbnail and wrap it as a PNG data URL
pub fn thumbnail_data_url(doc: &DesignDocument) -> Result<String> {
    let image = rendering::thumbnail(doc)?;
    Ok(format!("data:image/png;base64,{}", base64::engine::general_purpose::STANDARD.encode(&image.png_data)))
}

/// Build entries for every document, skipping ones that fail to render
pub fn entries(docs: &[DesignDocument]) -> Vec<LibraryEntry> {
    docs.iter()
        .filter_map(|doc| match LibraryEntry::from_document(doc) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("skipping library entry {:?}: {}", doc.id, e);
                None
            }
        })
        .collect()
}

/// Header line for the library view
pub fn summary(count: usize) -> String {
    match count {
        0 => "No designs yet. Create your first design!".to_string(),
        1 => "1 design in your library".to_string(),
        n => format!("{} designs in your library", n),
    }
}
