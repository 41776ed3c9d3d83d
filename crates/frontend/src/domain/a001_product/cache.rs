//! Browser-side snapshot of every product seen so far.
//!
//! The table only holds one page, but the selection can span pages; the
//! cache remembers each product's status so bulk actions can be offered for
//! ids that are not on screen.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use contracts::domain::a001_product::{Product, ProductSnapshot, ProductStatus};
use leptos::prelude::*;
use serde_json::Value;

use crate::shared::storage::{AppStorage, KeyValueStorage};

pub const ALL_PRODUCTS_KEY: &str = "allProductsMap";

pub struct ProductCache<S: KeyValueStorage> {
    storage: S,
    entries: HashMap<String, ProductSnapshot>,
}

impl<S: KeyValueStorage> ProductCache<S> {
    /// Loads the cache, keeping every valid entry.
    ///
    /// Entries without a `current_status` are dropped one by one; a payload
    /// that is not a JSON object resets the whole cache.
    pub fn load(storage: S) -> Self {
        let mut cache = Self {
            storage,
            entries: HashMap::new(),
        };
        let Some(raw) = cache.storage.get_item(ALL_PRODUCTS_KEY) else {
            return cache;
        };

        let map = match serde_json::from_str::<HashMap<String, Value>>(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("Error parsing product cache, resetting: {}", e);
                cache.persist();
                return cache;
            }
        };

        let total = map.len();
        for (id, value) in map {
            match serde_json::from_value::<ProductSnapshot>(value) {
                Ok(snapshot) if snapshot.is_valid() => {
                    cache.entries.insert(id, snapshot);
                }
                _ => {}
            }
        }

        let dropped = total - cache.entries.len();
        if dropped > 0 {
            log::warn!("Dropped {} invalid product cache entries", dropped);
            cache.persist();
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProductSnapshot> {
        self.entries.get(id)
    }

    pub fn status_of(&self, id: &str) -> Option<ProductStatus> {
        self.entries.get(id).and_then(ProductSnapshot::status)
    }

    /// Refreshes entries from a freshly fetched page.
    pub fn absorb(&mut self, products: &[Product]) {
        if products.is_empty() {
            return;
        }
        for product in products {
            let snapshot = ProductSnapshot::from(product);
            if snapshot.is_valid() {
                self.entries.insert(product.id.clone(), snapshot);
            } else {
                self.entries.remove(&product.id);
            }
        }
        self.persist();
    }

    /// Records a status change applied by a bulk update.
    pub fn set_status(&mut self, ids: &[String], status: ProductStatus) {
        for id in ids {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.current_status = Some(status.code().to_string());
            }
        }
        self.persist();
    }

    pub fn remove(&mut self, ids: &[String]) {
        for id in ids {
            self.entries.remove(id);
        }
        self.persist();
    }

    pub fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(raw) => self.storage.set_item(ALL_PRODUCTS_KEY, &raw),
            Err(e) => log::error!("Error serializing product cache: {}", e),
        }
    }
}

/// Status shared by all selected products.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStatus {
    Stored,
    Shipped,
    /// Statuses differ, or at least one id is not cached
    Mixed,
}

/// `None` for an empty selection.
pub fn classify_selection<'a, I, S>(ids: I, cache: &ProductCache<S>) -> Option<SelectionStatus>
where
    I: IntoIterator<Item = &'a String>,
    S: KeyValueStorage,
{
    let mut common: Option<ProductStatus> = None;
    let mut any = false;
    for id in ids {
        any = true;
        match (cache.status_of(id), common) {
            (None, _) => return Some(SelectionStatus::Mixed),
            (Some(status), None) => common = Some(status),
            (Some(status), Some(seen)) if status != seen => return Some(SelectionStatus::Mixed),
            _ => {}
        }
    }
    if !any {
        return None;
    }
    common.map(|status| match status {
        ProductStatus::Stored => SelectionStatus::Stored,
        ProductStatus::Shipped => SelectionStatus::Shipped,
    })
}

/// Which bulk buttons the action bar enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkAvailability {
    pub ship_out: bool,
    pub receive_in: bool,
    pub delete: bool,
}

impl From<Option<SelectionStatus>> for BulkAvailability {
    fn from(status: Option<SelectionStatus>) -> Self {
        Self {
            ship_out: status == Some(SelectionStatus::Stored),
            receive_in: status == Some(SelectionStatus::Shipped),
            delete: status.is_some(),
        }
    }
}

// ============================================================================
// Leptos glue
// ============================================================================

pub type SharedCache = Rc<RefCell<ProductCache<AppStorage>>>;

/// App-wide handle to the product cache.
///
/// `version` is bumped after every write so views deriving bulk
/// availability from the cache re-run.
#[derive(Clone, Copy)]
pub struct CacheService {
    cache: StoredValue<SharedCache, LocalStorage>,
    version: RwSignal<u64>,
}

impl CacheService {
    pub fn new() -> Self {
        Self::with_storage(AppStorage::detect())
    }

    pub fn with_storage(storage: AppStorage) -> Self {
        Self {
            cache: StoredValue::new_local(Rc::new(RefCell::new(ProductCache::load(storage)))),
            version: RwSignal::new(0),
        }
    }

    pub fn cache(&self) -> SharedCache {
        self.cache.get_value()
    }

    pub fn absorb(&self, products: &[Product]) {
        self.cache().borrow_mut().absorb(products);
        self.touch();
    }

    /// Marks the cache as changed after a write made through [`Self::cache`].
    pub fn touch(&self) {
        self.version.update(|v| *v += 1);
    }

    /// Which bulk actions `ids` allow; tracked.
    pub fn availability(&self, ids: &BTreeSet<String>) -> BulkAvailability {
        self.version.track();
        let cache = self.cache();
        let cache = cache.borrow();
        BulkAvailability::from(classify_selection(ids, &cache))
    }
}

pub fn use_product_cache() -> CacheService {
    use_context::<CacheService>().expect("CacheService not found in context")
}
