//! Slot storage persisted as a JSON object on disk
//!
//! Every write replaces the whole file: the new content goes to a sibling
//! `.tmp` file which is then renamed over the original.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SlotStorage;
use crate::error::{AppError, AppResult};

type Slots = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> AppResult<Slots> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Slots::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Slots::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            AppError::MalformedLocalState(format!(
                "Session file {} is unreadable: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_slots(&self, slots: &Slots) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn guard(&self) -> AppResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| AppError::Storage("Session file lock poisoned".to_string()))
    }
}

impl SlotStorage for FileStorage {
    fn get_items(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>> {
        let _guard = self.guard()?;
        let slots = self.read_slots()?;
        Ok(keys.iter().map(|key| slots.get(*key).cloned()).collect())
    }

    fn set_items(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let _guard = self.guard()?;
        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(AppError::MalformedLocalState(e)) => {
                tracing::warn!("Replacing session state: {}", e);
                Slots::new()
            }
            Err(e) => return Err(e),
        };
        for (key, value) in entries {
            slots.insert((*key).to_string(), value.clone());
        }
        self.write_slots(&slots)
    }

    fn remove_items(&self, keys: &[&str]) -> AppResult<()> {
        let _guard = self.guard()?;
        // an unreadable file is replaced rather than left in place
        let mut slots = match self.read_slots() {
            Ok(slots) => slots,
            Err(AppError::MalformedLocalState(_)) => Slots::new(),
            Err(e) => return Err(e),
        };
        if !self.path.exists() {
            return Ok(());
        }
        for key in keys {
            slots.remove(*key);
        }
        self.write_slots(&slots)
    }
}
