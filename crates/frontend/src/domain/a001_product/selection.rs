//! Selected product ids shared by the table and the bulk action bar.
//!
//! [`SelectionStore`] owns the set. Every write is persisted to storage
//! first and only then handed to subscribers, so anything reading storage
//! from a callback already sees the new value. Reading storage never
//! notifies; the only way an outside write reaches subscribers is an
//! explicit [`SelectionStore::reload_from_storage`] (the browser `storage`
//! event fired by another tab).

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use leptos::prelude::*;
use serde_json::Value;

use crate::shared::storage::{AppStorage, KeyValueStorage};

pub const SELECTED_IDS_KEY: &str = "selectedProductIds";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Written through this store
    Local,
    /// Picked up from storage written by another tab
    External,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChange {
    pub selected: BTreeSet<String>,
    pub origin: ChangeOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&SelectionChange)>;

pub struct SelectionStore<S: KeyValueStorage> {
    storage: S,
    selected: BTreeSet<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> SelectionStore<S> {
    pub fn load(storage: S) -> Self {
        let selected = read_persisted(&storage);
        Self {
            storage,
            selected,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flips membership of `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        let mut next = self.selected.clone();
        let now_selected = if next.remove(&id) {
            false
        } else {
            next.insert(id);
            true
        };
        self.commit(next);
        now_selected
    }

    pub fn set(&mut self, id: impl Into<String>, checked: bool) {
        let id = id.into();
        if self.selected.contains(&id) == checked {
            return;
        }
        let mut next = self.selected.clone();
        if checked {
            next.insert(id);
        } else {
            next.remove(&id);
        }
        self.commit(next);
    }

    /// Replaces the whole selection.
    pub fn set_all<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.commit(ids.into_iter().map(Into::into).collect());
    }

    pub fn clear(&mut self) {
        self.commit(BTreeSet::new());
    }

    /// Re-reads storage after another tab changed it.
    pub fn reload_from_storage(&mut self) {
        let persisted = read_persisted(&self.storage);
        if persisted == self.selected {
            return;
        }
        self.selected = persisted;
        self.notify(ChangeOrigin::External);
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&SelectionChange) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, next: BTreeSet<String>) {
        self.selected = next;
        write_persisted(&self.storage, &self.selected);
        self.notify(ChangeOrigin::Local);
    }

    fn notify(&self, origin: ChangeOrigin) {
        if self.listeners.is_empty() {
            return;
        }
        let change = SelectionChange {
            selected: self.selected.clone(),
            origin,
        };
        for (_, listener) in &self.listeners {
            listener(&change);
        }
    }
}

/// Reads the persisted id list, healing a missing or corrupt value to `[]`.
fn read_persisted<S: KeyValueStorage>(storage: &S) -> BTreeSet<String> {
    let Some(raw) = storage.get_item(SELECTED_IDS_KEY) else {
        storage.set_item(SELECTED_IDS_KEY, "[]");
        return BTreeSet::new();
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                other => {
                    log::warn!("Skipping invalid selected id: {}", other);
                    None
                }
            })
            .collect(),
        Ok(other) => {
            log::warn!("Selected ids are not an array ({}), resetting", other);
            storage.set_item(SELECTED_IDS_KEY, "[]");
            BTreeSet::new()
        }
        Err(e) => {
            log::warn!("Error parsing selected ids from localStorage: {}", e);
            storage.set_item(SELECTED_IDS_KEY, "[]");
            BTreeSet::new()
        }
    }
}

fn write_persisted<S: KeyValueStorage>(storage: &S, selected: &BTreeSet<String>) {
    match serde_json::to_string(selected) {
        Ok(raw) => storage.set_item(SELECTED_IDS_KEY, &raw),
        Err(e) => log::error!("Error serializing selected ids: {}", e),
    }
}

// ============================================================================
// Leptos glue
// ============================================================================

pub type SharedSelection = Rc<RefCell<SelectionStore<AppStorage>>>;

/// App-wide handle to the selection, provided through context.
///
/// The store stays the single source of truth; `selected` is a reactive
/// mirror fed by a store subscription so views can track it.
#[derive(Clone, Copy)]
pub struct SelectionService {
    store: StoredValue<SharedSelection, LocalStorage>,
    selected: RwSignal<BTreeSet<String>>,
}

impl SelectionService {
    pub fn new() -> Self {
        Self::with_storage(AppStorage::detect())
    }

    pub fn with_storage(storage: AppStorage) -> Self {
        let mut store = SelectionStore::load(storage);
        let selected = RwSignal::new(store.selected().clone());
        store.subscribe(move |change: &SelectionChange| {
            if change.origin == ChangeOrigin::External {
                log::debug!("Selection changed in another tab ({} ids)", change.selected.len());
            }
            selected.set(change.selected.clone());
        });

        Self {
            store: StoredValue::new_local(Rc::new(RefCell::new(store))),
            selected,
        }
    }

    /// Follows selection changes made in other tabs.
    pub fn listen_cross_tab(&self) {
        let this = *self;
        _ = window_event_listener(leptos::ev::storage, move |ev| {
            if ev.key().as_deref() == Some(SELECTED_IDS_KEY) {
                this.store().borrow_mut().reload_from_storage();
            }
        });
    }

    pub fn store(&self) -> SharedSelection {
        self.store.get_value()
    }

    pub fn selected(&self) -> Signal<BTreeSet<String>> {
        self.selected.into()
    }

    pub fn count(&self) -> usize {
        self.selected.with(|s| s.len())
    }

    pub fn set(&self, id: String, checked: bool) {
        self.store().borrow_mut().set(id, checked);
    }

    pub fn toggle(&self, id: String) {
        self.store().borrow_mut().toggle(id);
    }

    pub fn set_all(&self, ids: Vec<String>) {
        self.store().borrow_mut().set_all(ids);
    }

    pub fn clear(&self) {
        self.store().borrow_mut().clear();
    }
}

pub fn use_selection() -> SelectionService {
    use_context::<SelectionService>().expect("SelectionService not found in context")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;
    use std::cell::Cell;

    fn ids(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selection_survives_reload() {
        let storage = MemoryStorage::new();
        let mut store = SelectionStore::load(storage.clone());
        store.toggle("3");
        store.toggle("1");
        store.toggle("2");
        store.toggle("1");

        let reloaded = SelectionStore::load(storage);
        assert_eq!(reloaded.selected(), &ids(&["2", "3"]));
    }

    #[test]
    fn test_missing_key_is_initialized() {
        let storage = MemoryStorage::new();
        let store = SelectionStore::load(storage.clone());
        assert!(store.is_empty());
        assert_eq!(storage.get_item(SELECTED_IDS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_payload_heals_to_empty() {
        for garbage in ["not json", "{\"a\":1}", "42", "null"] {
            let storage = MemoryStorage::new();
            storage.set_item(SELECTED_IDS_KEY, garbage);
            let store = SelectionStore::load(storage.clone());
            assert!(store.is_empty(), "payload {garbage:?}");
            assert_eq!(storage.get_item(SELECTED_IDS_KEY).as_deref(), Some("[]"));
        }
    }

    #[test]
    fn test_numeric_ids_are_canonicalized() {
        let storage = MemoryStorage::new();
        storage.set_item(SELECTED_IDS_KEY, r#"[12, "7", 9007199254740993]"#);
        let store = SelectionStore::load(storage);
        assert_eq!(store.selected(), &ids(&["12", "7", "9007199254740993"]));
    }

    #[test]
    fn test_write_is_persisted_before_notification() {
        let storage = MemoryStorage::new();
        let mut store = SelectionStore::load(storage.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_listener = seen.clone();
        store.subscribe(move |change| {
            seen_in_listener.borrow_mut().push((
                change.origin,
                storage.get_item(SELECTED_IDS_KEY).unwrap_or_default(),
            ));
        });

        store.set_all(["5", "4"]);
        store.clear();

        assert_eq!(
            *seen.borrow(),
            vec![
                (ChangeOrigin::Local, r#"["4","5"]"#.to_string()),
                (ChangeOrigin::Local, "[]".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_without_change_does_not_notify() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        store.subscribe(move |_| counter.set(counter.get() + 1));

        store.set("1", true);
        store.set("1", true);
        store.set("2", false);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reload_from_storage_notifies_external() {
        let storage = MemoryStorage::new();
        let mut store = SelectionStore::load(storage.clone());
        let origins = Rc::new(RefCell::new(Vec::new()));
        let sink = origins.clone();
        store.subscribe(move |change| sink.borrow_mut().push(change.origin));

        // another tab writes the shared key
        storage.set_item(SELECTED_IDS_KEY, r#"["8"]"#);
        store.reload_from_storage();
        store.reload_from_storage();

        assert_eq!(store.selected(), &ids(&["8"]));
        assert_eq!(*origins.borrow(), vec![ChangeOrigin::External]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = SelectionStore::load(MemoryStorage::new());
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let id = store.subscribe(move |_| counter.set(counter.get() + 1));

        store.toggle("1");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.toggle("2");
        assert_eq!(calls.get(), 1);
    }
}
