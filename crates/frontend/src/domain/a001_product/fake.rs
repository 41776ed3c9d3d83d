//! In-memory [`ProductGateway`] for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use contracts::domain::a001_product::{BatchStatusRequest, BatchStatusResponse, Product};
use contracts::shared::{PageQuery, Paginated};

use super::api::ProductGateway;
use crate::shared::error::ApiError;

pub fn product(id: &str, status: Option<&str>) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "number": format!("N-{id}"),
        "date": "2025-06-30",
        "current_status": status,
    }))
    .unwrap()
}

#[derive(Default)]
pub struct FakeGateway {
    /// Backend pages, page 1 first
    pub pages: Vec<Vec<Product>>,
    pub fail_page: Cell<bool>,
    pub fail_total: Cell<bool>,
    pub fail_batch: Cell<bool>,
    pub fail_delete: RefCell<HashSet<String>>,
    pub queries: RefCell<Vec<PageQuery>>,
    pub deleted: RefCell<Vec<String>>,
    pub batches: RefCell<Vec<BatchStatusRequest>>,
}

impl FakeGateway {
    pub fn with_pages(pages: Vec<Vec<Product>>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    fn count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

impl ProductGateway for FakeGateway {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Paginated<Product>, ApiError> {
        self.queries.borrow_mut().push(query.clone());
        if self.fail_page.get() {
            return Err(ApiError::Network("connection reset".into()));
        }
        let index = query.page.max(1) - 1;
        let Some(results) = self.pages.get(index).cloned() else {
            return Err(ApiError::http(404, r#"{"detail": "Invalid page."}"#, "Failed to fetch products"));
        };
        Ok(Paginated {
            count: self.count(),
            next: None,
            previous: None,
            results,
        })
    }

    async fn fetch_total_pages(&self, _search: &str) -> Result<usize, ApiError> {
        if self.fail_total.get() {
            return Err(ApiError::http(500, "", "Failed to fetch products"));
        }
        Ok(self.pages.len())
    }

    async fn fetch_all(&self, _search: &str, categories: &[String]) -> Result<Vec<Product>, ApiError> {
        Ok(self
            .pages
            .iter()
            .flatten()
            .filter(|p| categories.is_empty() || categories.contains(&p.category))
            .cloned()
            .collect())
    }

    async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        if self.fail_delete.borrow().contains(id) {
            return Err(ApiError::http(500, "", "Failed to delete product"));
        }
        if self.deleted.borrow().iter().any(|d| d == id) {
            return Err(ApiError::http(404, r#"{"detail": "Not found."}"#, "Failed to delete product"));
        }
        self.deleted.borrow_mut().push(id.to_string());
        Ok(())
    }

    async fn batch_update_status(
        &self,
        request: &BatchStatusRequest,
    ) -> Result<BatchStatusResponse, ApiError> {
        if self.fail_batch.get() {
            return Err(ApiError::http(400, r#"{"message": "Invalid ids or status"}"#, "Failed to update status"));
        }
        self.batches.borrow_mut().push(request.clone());
        Ok(BatchStatusResponse {
            success: true,
            message: format!("已更新 {} 筆產品狀態", request.ids.len()),
            updated_count: request.ids.len() as u64,
        })
    }
}
