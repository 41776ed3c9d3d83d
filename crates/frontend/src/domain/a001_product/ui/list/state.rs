use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::a001_product::coordinator::SortState;
use crate::shared::storage::{AppStorage, KeyValueStorage};

const STORAGE_KEY: &str = "a001_product_list_state_v1";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PersistedState {
    pub search: String,
    pub page: usize,
    #[serde(default)]
    pub sort: SortState,
}

#[derive(Clone, Debug)]
pub struct ProductListState {
    pub search: String,

    /// 1-based
    pub page: usize,
    pub total_pages: usize,

    pub sort: SortState,

    /// The header checkbox selected every page of the current search
    pub all_selected: bool,

    pub is_loaded: bool,
}

impl ProductListState {
    /// Fresh state for the first visit: searching today's intake.
    pub fn first_visit(today: &str) -> Self {
        Self {
            search: today.to_string(),
            page: 1,
            total_pages: 0,
            sort: SortState::default(),
            all_selected: false,
            is_loaded: false,
        }
    }
}

fn load_persisted<S: KeyValueStorage>(storage: &S) -> Option<PersistedState> {
    let raw = storage.get_item(STORAGE_KEY)?;
    serde_json::from_str::<PersistedState>(&raw).ok()
}

fn save_persisted<S: KeyValueStorage>(storage: &S, st: &PersistedState) {
    let Ok(raw) = serde_json::to_string(st) else { return };
    storage.set_item(STORAGE_KEY, &raw);
}

/// Restores the saved state; a saved empty search stays empty, only a
/// missing state falls back to today's date.
pub fn restore<S: KeyValueStorage>(storage: &S, today: &str) -> ProductListState {
    let mut st = ProductListState::first_visit(today);
    if let Some(p) = load_persisted(storage) {
        st.search = p.search;
        st.page = p.page.max(1);
        st.sort = p.sort;
    }
    st
}

pub fn save<S: KeyValueStorage>(storage: &S, st: &ProductListState) {
    let persisted = PersistedState {
        search: st.search.clone(),
        page: st.page,
        sort: st.sort.clone(),
    };
    save_persisted(storage, &persisted);
}

pub fn persist_state(signal: RwSignal<ProductListState>) {
    signal.with_untracked(|st| save(&AppStorage::detect(), st));
}

pub fn create_state(today: &str) -> RwSignal<ProductListState> {
    RwSignal::new(restore(&AppStorage::detect(), today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStorage;
    use contracts::shared::SortOrder;

    #[test]
    fn test_first_visit_searches_today() {
        let st = restore(&MemoryStorage::new(), "2025-07-01");
        assert_eq!(st.search, "2025-07-01");
        assert_eq!(st.page, 1);
    }

    #[test]
    fn test_cleared_search_is_kept() {
        let storage = MemoryStorage::new();
        let mut st = ProductListState::first_visit("2025-07-01");
        st.search = String::new();
        st.page = 3;
        st.sort.toggle("barcode");
        st.sort.toggle("barcode");
        save(&storage, &st);

        let restored = restore(&storage, "2025-07-02");
        assert_eq!(restored.search, "");
        assert_eq!(restored.page, 3);
        assert_eq!(restored.sort.field_name(), "barcode");
        assert_eq!(restored.sort.order, SortOrder::Desc);
        assert!(!restored.is_loaded);
    }

    #[test]
    fn test_corrupt_state_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json");
        assert_eq!(restore(&storage, "2025-07-01").search, "2025-07-01");
    }
}
