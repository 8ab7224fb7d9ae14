//! In-process slot storage

use std::collections::HashMap;
use std::sync::RwLock;

use super::SlotStorage;
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::Storage("Session storage lock poisoned".to_string())
}

impl SlotStorage for MemoryStorage {
    fn get_items(&self, keys: &[&str]) -> AppResult<Vec<Option<String>>> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        Ok(keys.iter().map(|key| slots.get(*key).cloned()).collect())
    }

    fn set_items(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        for (key, value) in entries {
            slots.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> AppResult<()> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        for key in keys {
            slots.remove(*key);
        }
        Ok(())
    }
}
