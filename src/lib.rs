//! PrintStudio
//!
//! Turns a free-text prompt into a print-ready layout (business card, flyer,
//! door hanger), renders it to a pixel canvas for preview, hit-testing and
//! export, and persists designs as JSON files behind a small REST API.
//!
//! # Features
//!
//! - **Heuristic generation**: regex extraction of colors, names and contact
//!   fields, then template instantiation into positioned primitives
//! - **Software rendering**: one scene renderer for preview, thumbnail and
//!   300 DPI export, with system-font text (cosmic-text) and PNG output
//! - **`server`** (default): REST API over a file-backed store (`tiny_http`)
//! - **`client`** (default): blocking client for that API (`reqwest`)
//!
//! # Example
//!
//! ```
//! use printstudio::{generate_design, DesignType};
//!
//! let doc = generate_design(
//!     r#"A business card for a startup called "InnovateTech" in blue and white"#,
//!     DesignType::BusinessCard,
//! );
//! assert_eq!(doc.colors.primary_color, "#0066CC");
//! let png = printstudio::rendering::export_png(&doc).unwrap();
//! assert_eq!((png.width, png.height), (1050, 600));
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod design;
pub mod editor;
pub mod library;
pub mod prompt;
pub mod rendering;
pub mod store;
pub mod synth;
pub mod template;

// REST surface over the file store
#[cfg(feature = "server")]
pub mod server;

// Blocking consumer of the REST surface
#[cfg(feature = "client")]
pub mod client;

// Async-friendly session API (worker-backed)
pub mod async_api;

pub use async_api::Studio;
pub use design::{DesignDocument, DesignType, Element, ElementPatch, Shape, StructuredDescription};
pub use rendering::{hit_test, render, Surface, View};

/// Configuration for the studio and the design server
///
/// Defaults match a local development setup:
/// - the API listens on `127.0.0.1:5000`
/// - designs are stored under `./designs`
/// - generation is delayed by one second, like a remote model would be
///
/// # Examples
///
/// ```
/// let cfg = printstudio::StudioConfig::default();
/// assert_eq!(cfg.bind_addr, "127.0.0.1:5000");
/// ```
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Address the REST API binds to
    pub bind_addr: String,
    /// Directory holding `<id>.json` design files
    pub designs_dir: PathBuf,
    /// Directory exported PNGs are written to
    pub export_dir: PathBuf,
    /// Simulated generation latency in milliseconds
    pub generation_delay_ms: u64,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Persist through a running API instead of the local directory
    pub api_url: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            designs_dir: PathBuf::from("designs"),
            export_dir: PathBuf::from("."),
            generation_delay_ms: 1000,
            log_filter: "info".to_string(),
            api_url: None,
        }
    }
}

impl StudioConfig {
    /// Defaults overridden by `PORT`, `DESIGNS_DIR`, `PRINTSTUDIO_DELAY_MS` and `PRINTSTUDIO_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| Error::ConfigError(format!("PORT must be a port number, got {:?}", port)))?;
            let host = config.bind_addr.rsplit_once(':').map_or("127.0.0.1", |(h, _)| h).to_string();
            config.bind_addr = format!("{}:{}", host, port);
        }
        if let Some(dir) = lookup("DESIGNS_DIR") {
            config.designs_dir = PathBuf::from(dir);
        }
        if let Some(ms) = lookup("PRINTSTUDIO_DELAY_MS") {
            config.generation_delay_ms = ms.trim().parse().map_err(|_| {
                Error::ConfigError(format!("PRINTSTUDIO_DELAY_MS must be milliseconds, got {:?}", ms))
            })?;
        }
        if let Some(url) = lookup("PRINTSTUDIO_API_URL") {
            config.api_url = Some(url);
        }
        Ok(config)
    }
}

/// Interpret `prompt` and synthesize an unsaved document in one step
pub fn generate_design(prompt: &str, design_type: DesignType) -> DesignDocument {
    let description = prompt::interpret(prompt, design_type);
    synth::synthesize(&description, design_type)
}
