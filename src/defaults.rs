// Defaults module: named JSON slots for small persisted values

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

/// A directory of named slots, one JSON file per key.
#[derive(Debug, Clone)]
pub struct Defaults {
    dir: PathBuf,
}

impl Defaults {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Typed handle to the slot stored under `key`.
    pub fn slot<T>(&self, key: &str) -> Slot<T> {
        Slot {
            path: self.dir.join(format!("{}.json", key)),
            _value: PhantomData,
        }
    }
}

/// A single persisted value of type `T`.
#[derive(Debug)]
pub struct Slot<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _value: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Slot<T> {
    /// Read the slot, `None` if nothing was ever stored.
    pub fn get(&self) -> anyhow::Result<Option<T>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        let value = serde_json::from_slice(&data)
            .with_context(|| format!("Corrupt slot {}", self.path.display()))?;
        Ok(Some(value))
    }

    pub fn set(&self, value: &T) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(value)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    pub fn remove(&self) -> anyhow::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_absent_slot_reads_none() {
        let dir = TempDir::new().unwrap();
        let defaults = Defaults::new(dir.path().join("defaults"));
        let slot = defaults.slot::<String>("ImageManager.version");
        assert_eq!(slot.get().unwrap(), None);
    }

    #[test]
    fn test_slot_stores_value() {
        let dir = TempDir::new().unwrap();
        let defaults = Defaults::new(dir.path().join("defaults"));
        let slot = defaults.slot::<BTreeMap<String, u32>>("counts");

        let mut counts = BTreeMap::new();
        counts.insert("maps".to_string(), 12);
        slot.set(&counts).unwrap();

        assert_eq!(slot.get().unwrap(), Some(counts));
        assert!(dir.path().join("defaults/counts.json").exists());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let slot = Defaults::new(dir.path()).slot::<String>("version");
        slot.set(&"abc".to_string()).unwrap();
        slot.remove().unwrap();
        slot.remove().unwrap();
        assert_eq!(slot.get().unwrap(), None);
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let dir = TempDir::new().unwrap();
        let slot = Defaults::new(dir.path()).slot::<String>("version");
        fs::write(dir.path().join("version.json"), "not json").unwrap();
        assert!(slot.get().is_err());
    }
}
