use std::{collections::BTreeMap, fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use stories_core::store::{KeyValueStore, StoreError};

/// Key-value storage kept as a flat JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

pub fn storage_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let dir = base.data_dir().join("hacker-stories");
    Some(dir.join("storage.json"))
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = if path.exists() {
            let data =
                fs::read(&path).with_context(|| format!("read storage file: {}", path.display()))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("parse storage json: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn open_default() -> Result<Self> {
        let path = storage_path().context("no data directory for this platform")?;
        Self::open(path)
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&self.entries)?;
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&data)?;
            f.flush()?;
        }
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}
