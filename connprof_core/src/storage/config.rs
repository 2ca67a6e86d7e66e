use std::{
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use directories::ProjectDirs;
use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};

use crate::errors::ProfileError;

/// Key-value view of the user-level (global) settings document.
///
/// Every write targets the global scope; there is no per-workspace layer.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// `Ok(None)` when the key, or the whole document, is absent.
    async fn read(&self, key: &str) -> Result<Option<Value>, ProfileError>;

    /// Replace the value stored under `key`, leaving other keys untouched.
    async fn write(&self, key: &str, value: Value) -> Result<(), ProfileError>;
}

/// Settings document stored as a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileConfig {
    path: PathBuf,
}

impl JsonFileConfig {
    /// `~/.config/connprof/settings.json` on Linux, `%APPDATA%\connprof\settings.json` on Windows, etc.
    pub fn new() -> io::Result<Self> {
        let proj = ProjectDirs::from("", "", "connprof")
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Unable to locate config dir"))?;
        Ok(Self::at(proj.config_dir().join("settings.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` if the file does not exist yet.
    async fn load_text(&self) -> Result<Option<String>, ProfileError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_document(text: &str) -> Option<Map<String, Value>> {
    if text.trim().is_empty() {
        return Some(Map::new());
    }
    match serde_json::from_str(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfig {
    async fn read(&self, key: &str) -> Result<Option<Value>, ProfileError> {
        let Some(text) = self.load_text().await? else {
            debug!("Settings file {:?} does not exist yet", self.path);
            return Ok(None);
        };
        match parse_document(&text) {
            Some(mut doc) => Ok(doc.remove(key)),
            None => {
                warn!("Settings file {:?} is not a JSON object; ignoring it", self.path);
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), ProfileError> {
        let mut doc = match self.load_text().await? {
            None => Map::new(),
            Some(text) => parse_document(&text).ok_or_else(|| {
                ProfileError::Config(format!(
                    "refusing to overwrite malformed settings file {:?}",
                    self.path
                ))
            })?,
        };
        doc.insert(key.to_owned(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write next to the target and rename so readers never see half a document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&Value::Object(doc))?).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!("Wrote key {key:?} to {:?}", self.path);
        Ok(())
    }
}

/// In-process settings document.
///
/// Clones share the same document. Writes can be made to fail on demand so
/// callers can exercise their persistence-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    doc: Arc<Mutex<Map<String, Value>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the document with a raw value, bypassing any sanitising.
    pub async fn insert_raw(&self, key: &str, value: Value) {
        self.doc.lock().await.insert(key.to_owned(), value);
    }

    /// The raw value as persisted.
    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.doc.lock().await.get(key).cloned()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfigStore for MemoryConfig {
    async fn read(&self, key: &str) -> Result<Option<Value>, ProfileError> {
        Ok(self.doc.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), ProfileError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProfileError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "settings document is read-only",
            )));
        }
        self.doc.lock().await.insert(key.to_owned(), value);
        Ok(())
    }
}
