//! Key-value persistence behind the browser's `localStorage`.
//!
//! Stores that persist state take any [`KeyValueStorage`], so the same code
//! runs against the real browser storage and against [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`
#[derive(Clone)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> Option<Self> {
        let inner = web_sys::window()?.local_storage().ok()??;
        Some(Self { inner })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.set_item(key, value) {
            log::error!("Error saving {} to localStorage: {:?}", key, e);
        }
    }

    fn remove_item(&self, key: &str) {
        let _ = self.inner.remove_item(key);
    }
}

/// Process-local storage; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Browser storage when available, memory otherwise (private mode, tests).
#[derive(Clone)]
pub enum AppStorage {
    Browser(BrowserStorage),
    Memory(MemoryStorage),
}

impl AppStorage {
    pub fn detect() -> Self {
        match BrowserStorage::local() {
            Some(storage) => AppStorage::Browser(storage),
            None => {
                log::warn!("localStorage unavailable, selection will not survive reloads");
                AppStorage::Memory(MemoryStorage::new())
            }
        }
    }
}

impl KeyValueStorage for AppStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self {
            AppStorage::Browser(s) => s.get_item(key),
            AppStorage::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        match self {
            AppStorage::Browser(s) => s.set_item(key, value),
            AppStorage::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) {
        match self {
            AppStorage::Browser(s) => s.remove_item(key),
            AppStorage::Memory(s) => s.remove_item(key),
        }
    }
}
