//! Bulk actions on the selected products.

use std::cell::RefCell;

use contracts::domain::a001_product::{BatchStatusRequest, ProductStatus};
use contracts::shared::ActionResult;
use leptos::prelude::*;

use super::api::{delete_products, ProductGateway};
use super::cache::ProductCache;
use super::selection::SelectionStore;
use crate::shared::storage::KeyValueStorage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkAction {
    /// 出貨
    ShipOut,
    /// 入庫
    ReceiveIn,
    Delete,
}

impl BulkAction {
    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::ShipOut => "出貨",
            BulkAction::ReceiveIn => "入庫",
            BulkAction::Delete => "刪除",
        }
    }

    pub fn target_status(&self) -> Option<ProductStatus> {
        match self {
            BulkAction::ShipOut => Some(ProductStatus::Shipped),
            BulkAction::ReceiveIn => Some(ProductStatus::Stored),
            BulkAction::Delete => None,
        }
    }

    pub fn confirm_message(&self, count: usize) -> String {
        match self {
            BulkAction::Delete => format!("確定要刪除選取的 {} 項產品嗎？", count),
            other => format!("確定要將選取的 {} 項產品{}嗎？", count, other.label()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkOutcome {
    pub success: bool,
    pub message: String,
    /// The table should reload its current page
    pub refresh: bool,
}

impl<T> From<ActionResult<T>> for BulkOutcome {
    fn from(result: ActionResult<T>) -> Self {
        Self {
            success: result.success,
            message: result.message,
            refresh: result.success,
        }
    }
}

/// Applies `action` to the current selection.
///
/// Only a successful call clears the selection; after a failure the ids
/// still on the backend stay selected so the user can retry. `today` is
/// the `ex_date` sent with status changes.
pub async fn run_bulk_action<G, S, C>(
    gateway: &G,
    selection: &RefCell<SelectionStore<S>>,
    cache: &RefCell<ProductCache<C>>,
    action: BulkAction,
    today: &str,
) -> Option<BulkOutcome>
where
    G: ProductGateway,
    S: KeyValueStorage,
    C: KeyValueStorage,
{
    let ids = selection.borrow().ids();
    if ids.is_empty() {
        return None;
    }

    let Some(status) = action.target_status() else {
        return Some(delete_selected(gateway, selection, cache, &ids).await);
    };

    let request = BatchStatusRequest {
        ids: ids.clone(),
        current_status: status,
        ex_date: Some(today.to_string()),
    };
    let result = match gateway.batch_update_status(&request).await {
        Ok(response) if response.message.is_empty() => {
            ActionResult::ok("Status updated successfully", ())
        }
        Ok(response) => ActionResult::ok(response.message, ()),
        Err(e) => ActionResult::failed(e.to_string()),
    };

    if result.success {
        cache.borrow_mut().set_status(&ids, status);
        selection.borrow_mut().clear();
        log::info!("{} applied to {} products", action.label(), ids.len());
    } else {
        log::error!("{} failed: {}", action.label(), result.message);
    }

    Some(result.into())
}

/// Deletes the selected ids.
///
/// Ids that are gone afterwards leave the selection and the cache even when
/// others failed, so a retry only covers what is still on the backend.
async fn delete_selected<G, S, C>(
    gateway: &G,
    selection: &RefCell<SelectionStore<S>>,
    cache: &RefCell<ProductCache<C>>,
    ids: &[String],
) -> BulkOutcome
where
    G: ProductGateway,
    S: KeyValueStorage,
    C: KeyValueStorage,
{
    let (deleted, failure) = match delete_products(gateway, ids).await {
        Ok(()) => (ids.to_vec(), None),
        Err(failure) => (failure.deleted.clone(), Some(failure)),
    };

    if !deleted.is_empty() {
        cache.borrow_mut().remove(&deleted);
        let mut store = selection.borrow_mut();
        if failure.is_none() {
            store.clear();
        } else {
            for id in &deleted {
                store.set(id.as_str(), false);
            }
        }
    }

    match failure {
        None => {
            log::info!("{} applied to {} products", BulkAction::Delete.label(), ids.len());
            BulkOutcome {
                success: true,
                message: format!("Successfully deleted {} products", ids.len()),
                refresh: true,
            }
        }
        Some(failure) => {
            log::error!("{} failed: {}", BulkAction::Delete.label(), failure);
            BulkOutcome {
                success: false,
                message: format!("Failed to delete products: {}", failure),
                refresh: !deleted.is_empty(),
            }
        }
    }
}

/// Bumped whenever the product table must reload its current page.
#[derive(Clone, Copy)]
pub struct RefreshTrigger(RwSignal<u64>);

impl RefreshTrigger {
    pub fn new() -> Self {
        Self(RwSignal::new(0))
    }

    pub fn trigger(&self) {
        self.0.update(|n| *n += 1);
    }

    /// Tracked read; effects calling this re-run on every trigger.
    pub fn track(&self) -> u64 {
        self.0.get()
    }
}

pub fn use_refresh() -> RefreshTrigger {
    use_context::<RefreshTrigger>().expect("RefreshTrigger not found in context")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::fake::{product, FakeGateway};
    use crate::shared::storage::MemoryStorage;
    use futures::executor::block_on;

    struct Fixture {
        gateway: FakeGateway,
        selection: RefCell<SelectionStore<MemoryStorage>>,
        cache: RefCell<ProductCache<MemoryStorage>>,
    }

    fn fixture() -> Fixture {
        let gateway = FakeGateway::with_pages(vec![vec![
            product("1", Some("0")),
            product("2", Some("0")),
            product("3", Some("1")),
        ]]);
        let mut cache = ProductCache::load(MemoryStorage::new());
        cache.absorb(&gateway.pages[0]);
        let mut selection = SelectionStore::load(MemoryStorage::new());
        selection.set_all(["1", "2"]);
        Fixture {
            gateway,
            selection: RefCell::new(selection),
            cache: RefCell::new(cache),
        }
    }

    fn run(f: &Fixture, action: BulkAction) -> Option<BulkOutcome> {
        block_on(run_bulk_action(&f.gateway, &f.selection, &f.cache, action, "2025-07-01"))
    }

    #[test]
    fn test_failed_delete_keeps_selection() {
        let f = fixture();
        f.gateway.fail_delete.borrow_mut().insert("2".to_string());

        f.gateway.fail_delete.borrow_mut().insert("1".to_string());

        let outcome = run(&f, BulkAction::Delete).unwrap();
        assert!(!outcome.success);
        assert!(!outcome.refresh);
        assert!(outcome.message.starts_with("Failed to delete products"));
        assert!(outcome.message.contains("product 1"));
        assert_eq!(f.selection.borrow().len(), 2);
        assert_eq!(f.cache.borrow().len(), 3);
    }

    #[test]
    fn test_partial_delete_drops_deleted_ids_and_retry_succeeds() {
        let f = fixture();
        f.gateway.fail_delete.borrow_mut().insert("2".to_string());

        let first = run(&f, BulkAction::Delete).unwrap();
        assert!(!first.success);
        assert!(first.refresh);
        assert_eq!(f.selection.borrow().ids(), vec!["2"]);
        assert!(f.cache.borrow().get("1").is_none());
        assert!(f.cache.borrow().get("2").is_some());

        f.gateway.fail_delete.borrow_mut().clear();
        let retry = run(&f, BulkAction::Delete).unwrap();
        assert!(retry.success);
        assert!(f.selection.borrow().is_empty());
        assert!(f.cache.borrow().get("2").is_none());
    }

    #[test]
    fn test_delete_of_already_deleted_product_succeeds() {
        let f = fixture();
        f.gateway.deleted.borrow_mut().push("1".to_string());

        let outcome = run(&f, BulkAction::Delete).unwrap();
        assert!(outcome.success);
        assert!(f.selection.borrow().is_empty());
    }

    #[test]
    fn test_successful_delete_clears_selection_and_refreshes() {
        let f = fixture();
        let outcome = run(&f, BulkAction::Delete).unwrap();

        assert!(outcome.success);
        assert!(outcome.refresh);
        assert_eq!(outcome.message, "Successfully deleted 2 products");
        assert!(f.selection.borrow().is_empty());
        let mut deleted = f.gateway.deleted.borrow().clone();
        deleted.sort();
        assert_eq!(deleted, vec!["1", "2"]);
        assert!(f.cache.borrow().get("1").is_none());
        assert!(f.cache.borrow().get("3").is_some());
    }

    #[test]
    fn test_ship_out_sends_today_and_updates_cache() {
        let f = fixture();
        let outcome = run(&f, BulkAction::ShipOut).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.message, "已更新 2 筆產品狀態");
        let batches = f.gateway.batches.borrow();
        assert_eq!(batches[0].current_status, ProductStatus::Shipped);
        assert_eq!(batches[0].ex_date.as_deref(), Some("2025-07-01"));
        assert_eq!(f.cache.borrow().status_of("1"), Some(ProductStatus::Shipped));
        assert!(f.selection.borrow().is_empty());
    }

    #[test]
    fn test_failed_status_change_keeps_selection() {
        let f = fixture();
        f.gateway.fail_batch.set(true);
        let outcome = run(&f, BulkAction::ReceiveIn).unwrap();

        assert!(!outcome.success);
        assert!(!outcome.refresh);
        assert_eq!(outcome.message, "Invalid ids or status");
        assert_eq!(f.selection.borrow().len(), 2);
        assert_eq!(f.cache.borrow().status_of("1"), Some(ProductStatus::Stored));
    }

    #[test]
    fn test_empty_selection_is_a_no_op() {
        let f = fixture();
        f.selection.borrow_mut().clear();
        assert_eq!(run(&f, BulkAction::Delete), None);
        assert!(f.gateway.deleted.borrow().is_empty());
    }
}
