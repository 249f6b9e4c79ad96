//! Blocking client for the design API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;

use crate::design::DesignDocument;
use crate::{Error, Result};

/// Talks to a running design server (see [`crate::server`])
#[derive(Debug, Clone)]
pub struct DesignClient {
    http: Client,
    base_url: String,
}

impl DesignClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::NetworkError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    fn collection(&self) -> String {
        format!("{}/api/designs", self.base_url)
    }

    fn item(&self, id: &str) -> String {
        format!("{}/api/designs/{}", self.base_url, id)
    }

    /// Map non-2xx responses onto crate errors, using the `{"error": ...}` body when present
    fn check(resp: Response, id: Option<&str>) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id.unwrap_or_default().to_string()));
        }
        let message = resp
            .json::<Value>()
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(Error::NetworkError(format!("{}: {}", status, message)))
    }

    /// Every stored design that parses as a document; others are skipped with a warning
    pub fn list(&self) -> Result<Vec<DesignDocument>> {
        let resp = Self::check(self.http.get(self.collection()).send()?, None)?;
        let raw: Vec<Value> = resp.json()?;
        Ok(raw
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<DesignDocument>(v) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    log::warn!("skipping unparseable design: {}", e);
                    None
                }
            })
            .collect())
    }

    pub fn get(&self, id: &str) -> Result<DesignDocument> {
        let resp = Self::check(self.http.get(self.item(id)).send()?, Some(id))?;
        Ok(resp.json()?)
    }

    /// POST; the returned document carries the assigned id and timestamps
    pub fn create(&self, doc: &DesignDocument) -> Result<DesignDocument> {
        let resp = Self::check(self.http.post(self.collection()).json(doc).send()?, None)?;
        Ok(resp.json()?)
    }

    /// PUT over the stored copy of `id`
    pub fn update(&self, id: &str, doc: &DesignDocument) -> Result<DesignDocument> {
        let resp = Self::check(self.http.put(self.item(id)).json(doc).send()?, Some(id))?;
        Ok(resp.json()?)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        Self::check(self.http.delete(self.item(id)).send()?, Some(id))?;
        Ok(())
    }

    /// Overwrite when the document already has an id, create otherwise
    pub fn save(&self, doc: &DesignDocument) -> Result<DesignDocument> {
        match doc.id.as_deref() {
            Some(id) => self.update(id, doc),
            None => self.create(doc),
        }
    }
}
