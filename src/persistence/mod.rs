//! Key/value score persistence
//!
//! Features:
//! - `ScoreStore` trait: one integer per fixed key
//! - `LocalStorageStore` backed by `window.localStorage` (wasm only)
//! - `MemoryStore` for native runs and tests
//!
//! Absent or malformed values read as `None`; callers treat that as zero.

use std::collections::HashMap;

/// Integer key/value store
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<u64>;
    fn set(&mut self, key: &str, value: u64);
}

/// Parse a stored value the way it was written (decimal digits)
pub fn parse_stored(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw string value (lets tests plant malformed data)
    pub fn insert_raw(&mut self, key: &str, raw: &str) {
        self.values.insert(key.to_string(), raw.to_string());
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).and_then(|raw| parse_stored(raw))
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// `window.localStorage` store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<u64> {
        let raw = Self::storage()?.get_item(key).ok()??;
        parse_stored(&raw)
    }

    fn set(&mut self, key: &str, value: u64) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, &value.to_string()).is_err() {
                    log::warn!("Failed to write {} to LocalStorage", key);
                }
            }
            None => log::warn!("LocalStorage unavailable, {} not saved", key),
        }
    }
}
