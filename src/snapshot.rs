use crate::errors::{ReqcapError, Result};
use crate::response::Response;
use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A saved response used as a baseline for later diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status_code: Option<u16>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub saved_at: String,
}

impl Snapshot {
    /// Capture `response` now.
    pub fn capture(response: &Response) -> Self {
        Self {
            status_code: Some(response.status_code),
            headers: response.headers.clone(),
            body: response.body.clone(),
            saved_at: Utc::now().to_rfc3339(),
        }
    }

    /// The snapshot as a live response, for replaying it through the pipeline.
    pub fn replay(&self) -> Response {
        Response {
            status_code: self.status_code.unwrap_or_default(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            elapsed_ms: 0.0,
        }
    }
}

/// Name and timestamp of a stored snapshot, as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub name: String,
    pub saved_at: String,
}

/// A directory of `<name>.json` snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Write `response` as snapshot `name`, replacing any previous one.
    /// Creates the directory when missing.
    pub fn save(&self, name: &str, response: &Response) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let snapshot = Snapshot::capture(response);
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        info!(name, path = %path.display(), "snapshot saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ReqcapError::SnapshotNotFound(name.to_string()));
        }
        let text = fs::read_to_string(&path)?;
        debug!(name, path = %path.display(), "loading snapshot");
        serde_json::from_str(&text).map_err(|source| ReqcapError::InvalidSnapshot {
            name: name.to_string(),
            source,
        })
    }

    /// Every snapshot in the directory, sorted by name. A missing directory
    /// lists as empty; unreadable files list with a `?` timestamp.
    pub fn list(&self) -> Result<Vec<SnapshotEntry>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut paths = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect::<Vec<_>>();
        paths.sort();

        let entries = paths
            .into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                let saved_at = match read_saved_at(&path) {
                    Some(saved_at) => saved_at,
                    None => {
                        warn!(path = %path.display(), "unreadable snapshot");
                        "?".to_string()
                    }
                };
                Some(SnapshotEntry { name, saved_at })
            })
            .collect();
        Ok(entries)
    }
}

fn read_saved_at(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let data: Value = serde_json::from_str(&text).ok()?;
    Some(data.get("saved_at").map(display_saved_at).unwrap_or_default())
}

fn display_saved_at(v: &Value) -> String {
    v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())
}
