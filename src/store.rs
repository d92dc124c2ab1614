use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON object keyed by content id, rewritten sorted by key on every save.
pub struct JsonStore<V> {
    path: PathBuf,
    entries: BTreeMap<String, V>,
}

pub enum LoadOutcome {
    Missing,
    Loaded(usize),
    Corrupt(String),
}

impl<V: Serialize + DeserializeOwned> JsonStore<V> {
    /// Loads `path`; a missing or undecodable file starts an empty store.
    /// Only a missing file is `Missing`; any other read failure is `Corrupt`.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let path = path.into();
        let (entries, outcome) = match fs::read_to_string(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => (BTreeMap::new(), LoadOutcome::Missing),
            Err(e) => (BTreeMap::new(), LoadOutcome::Corrupt(e.to_string())),
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, V>>(&raw) {
                Ok(map) => { let n = map.len(); (map, LoadOutcome::Loaded(n)) }
                Err(e) => (BTreeMap::new(), LoadOutcome::Corrupt(e.to_string())),
            },
        };
        (Self { path, entries }, outcome)
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns true when the key was new.
    pub fn upsert(&mut self, key: impl Into<String>, value: V) -> bool {
        self.entries.insert(key.into(), value).is_none()
    }

    pub fn save(&self) -> Result<()> {
        write_json_pretty(&self.path, &self.entries)
    }
}

pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
