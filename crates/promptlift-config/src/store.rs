//! Process-wide key-value storage and the credential kept in it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use promptlift_protocols::{Credential, CREDENTIAL_KEY};

use crate::error::ConfigError;
use crate::loader::ConfigLoader;

/// Environment variable that takes precedence over any stored key.
pub const CREDENTIAL_ENV_VAR: &str = "GEMINI_API_KEY";

/// Flat string-keyed storage of JSON values. No expiry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError>;
    fn set(&self, key: &str, value: Value) -> Result<(), ConfigError>;
    fn remove(&self, key: &str) -> Result<(), ConfigError>;
}

/// Store backed by a single JSON object file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the configured path, or `~/.promptlift/storage.json`.
    pub fn from_config(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::new(ConfigLoader::expand_path(&p.to_string_lossy())),
            None => Self::new(ConfigLoader::app_dir().join("storage.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, ConfigError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &serde_json::to_vec_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Wrote {} storage keys to {}", map.len(), self.path.display());
        Ok(())
    }
}

/// Write `bytes` to `path`, readable by the owner only. The store holds the API key.
#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its bits.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        let _guard = self.lock.lock();
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-process store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Reads and writes the generation API key under [`CREDENTIAL_KEY`].
pub struct CredentialStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// The stored key, if any.
    pub fn load(&self) -> Result<Option<Credential>, ConfigError> {
        match self.store.get(CREDENTIAL_KEY)? {
            Some(Value::String(key)) => Ok(Credential::new(key)),
            Some(_) => Err(ConfigError::Storage(format!(
                "{} is not a string",
                CREDENTIAL_KEY
            ))),
            None => Ok(None),
        }
    }

    /// Persist a new key. Blank input is rejected and leaves the old key in place.
    pub fn save(&self, input: &str) -> Result<Credential, ConfigError> {
        let credential = Credential::new(input).ok_or_else(|| ConfigError::InvalidValue {
            field: CREDENTIAL_KEY.to_string(),
            message: "Please enter a valid API key".to_string(),
        })?;
        self.store
            .set(CREDENTIAL_KEY, Value::String(credential.expose().to_string()))?;
        Ok(credential)
    }

    pub fn clear(&self) -> Result<(), ConfigError> {
        self.store.remove(CREDENTIAL_KEY)
    }

    /// Effective key: `GEMINI_API_KEY`, then the config file's key, then storage.
    pub fn resolve(&self, config_key: Option<&str>) -> Result<Option<Credential>, ConfigError> {
        if let Some(cred) = std::env::var(CREDENTIAL_ENV_VAR).ok().and_then(Credential::new) {
            return Ok(Some(cred));
        }
        if let Some(cred) = config_key.and_then(Credential::new) {
            return Ok(Some(cred));
        }
        self.load()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
