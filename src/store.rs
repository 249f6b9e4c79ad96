//! File-backed design store.
//!
//! Each design is one pretty-printed JSON file, `<dir>/<id>.json`. Documents
//! are kept as untyped JSON objects: the store owns `id`, `createdAt` and
//! `updatedAt` and passes every other field through untouched.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{Error, Result};

/// A JSON object as stored on disk
pub type Record = Map<String, Value>;

/// Persistence seam used by the REST server.
pub trait DesignStore: Send + Sync {
    /// Every readable stored design
    fn list(&self) -> Result<Vec<Record>>;

    fn get(&self, id: &str) -> Result<Record>;

    /// Store `body` under a fresh id with both timestamps set
    fn create(&self, body: Record) -> Result<Record>;

    /// Shallow-merge `body` onto the stored design; `id` is forced and `updatedAt` refreshed
    fn update(&self, id: &str, body: Record) -> Result<Record>;

    fn delete(&self, id: &str) -> Result<()>;
}

/// Ids are used as file names, so anything outside `[A-Za-z0-9_-]` is rejected
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// RFC 3339 with milliseconds and a `Z` suffix
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Storage(format!("cannot create designs dir {:?}: {}", dir, e)))?;
        log::debug!("design store at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        if !is_valid_id(id) {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    fn read(&self, path: &Path, id: &str) -> Result<Record> {
        if !path.exists() {
            return Err(Error::NotFound(id.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(_) => {
                log::warn!("stored design {:?} is not a JSON object", path);
                Err(Error::NotFound(id.to_string()))
            }
            Err(e) => {
                log::warn!("stored design {:?} is malformed: {}", path, e);
                Err(Error::NotFound(id.to_string()))
            }
        }
    }

    fn write(&self, path: &Path, record: &Record) -> Result<()> {
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(path, content)?;
        log::debug!("wrote {:?}", path);
        Ok(())
    }
}

/// `now`, bumped past `previous` so successive updates always move forward
fn next_update_time(previous: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    // stored stamps carry milliseconds only
    let now = now.trunc_subsecs(3);
    let previous = previous
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));
    match previous {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}

impl DesignStore for FileStore {
    fn list(&self) -> Result<Vec<Record>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |e| e == "json"))
            .collect();
        paths.sort();

        let mut designs = Vec::with_capacity(paths.len());
        for path in paths {
            let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
            match self.read(&path, &id) {
                Ok(record) => designs.push(record),
                Err(e) => log::warn!("skipping {:?}: {}", path, e),
            }
        }
        Ok(designs)
    }

    fn get(&self, id: &str) -> Result<Record> {
        let path = self.path_for(id)?;
        self.read(&path, id)
    }

    fn create(&self, mut body: Record) -> Result<Record> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp(Utc::now());
        body.insert("id".into(), Value::String(id.clone()));
        body.insert("createdAt".into(), Value::String(now.clone()));
        body.insert("updatedAt".into(), Value::String(now));

        self.write(&self.path_for(&id)?, &body)?;
        log::info!("created design {}", id);
        Ok(body)
    }

    fn update(&self, id: &str, body: Record) -> Result<Record> {
        let path = self.path_for(id)?;
        let mut record = self.read(&path, id)?;
        let updated_at = next_update_time(record.get("updatedAt"), Utc::now());

        record.extend(body);
        record.insert("id".into(), Value::String(id.to_string()));
        record.insert("updatedAt".into(), Value::String(timestamp(updated_at)));

        self.write(&path, &record)?;
        log::info!("updated design {}", id);
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(Error::NotFound(id.to_string()));
        }
        std::fs::remove_file(&path)?;
        log::info!("deleted design {}", id);
        Ok(())
    }
}
