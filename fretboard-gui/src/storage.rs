//! # Storage Module
//!
//! A small key-value store persisted as one JSON document. Keys are dotted
//! paths into nested objects, so `settings.tuning` and `settings` address
//! the same data at different depths. Everything lives under a single
//! application namespace inside the document.
//!
//! Every write is flushed to disk immediately.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const NAMESPACE: &str = "fretboardapp";
const FILE_NAME: &str = "settings.json";

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    root: Map<String, Value>,
}

impl JsonStore {
    /// `<config dir>/fretboard/settings.json`, or the working directory when
    /// the platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("fretboard"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(FILE_NAME)
    }

    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };

        log::debug!("[STORE] Opened {}", path.display());
        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The value at `key`, if present and of the right shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut node = self.root.get(NAMESPACE)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }

        match serde_json::from_value(node.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("[STORE] Ignoring malformed `{}`: {}", key, e);
                None
            }
        }
    }

    /// Stores `value` at `key`, creating intermediate objects as needed.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).with_context(|| format!("serializing `{key}`"))?;

        let (parents, leaf) = split_key(key);
        let mut node = &mut self.root;
        for part in std::iter::once(NAMESPACE).chain(parents) {
            node = child_object(node, part).with_context(|| format!("`{part}` is not an object"))?;
        }
        node.insert(leaf.to_string(), value);

        self.flush()
    }

    /// Drops `key` and everything below it. Missing keys are fine.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let (parents, leaf) = split_key(key);

        let mut node = self.root.get_mut(NAMESPACE);
        for part in parents {
            node = node.and_then(|n| n.get_mut(part));
        }
        let removed = node
            .and_then(Value::as_object_mut)
            .and_then(|object| object.remove(leaf))
            .is_some();

        if removed { self.flush() } else { Ok(()) }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.root)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

/// `a.b.c` -> (`[a, b]`, `c`)
fn split_key(key: &str) -> (Vec<&str>, &str) {
    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().unwrap_or(key);
    (parts, leaf)
}

/// The object stored under `key`. A missing or non-object value is
/// replaced by an empty object first.
fn child_object<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Option<&'a mut Map<String, Value>> {
    let child = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    child.as_object_mut()
}
