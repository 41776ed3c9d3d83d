//! Pagination and sort coordination for the product table.
//!
//! A page load is one unit: the product page and the page count are fetched
//! together and either both land or neither does.

use std::collections::HashSet;

use contracts::domain::a001_product::{Product, ProductCategory};
use contracts::shared::{clamp_page, PageQuery, SortOrder, SortSpec};
use serde::{Deserialize, Serialize};

use super::api::ProductGateway;
use crate::shared::error::ApiError;

/// The one column sorted in the browser instead of by the backend.
pub const CLIENT_SORTED_FIELD: &str = "current_status";

pub fn is_client_sorted(field: &str) -> bool {
    field == CLIENT_SORTED_FIELD
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<String>,
    pub order: SortOrder,
}

impl SortState {
    /// Same field flips the order, a new field starts ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.order = self.order.reversed();
        } else {
            self.field = Some(field.to_string());
            self.order = SortOrder::Asc;
        }
    }

    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or_default()
    }

    /// Sort sent to the backend; client-sorted fields are left out.
    pub fn backend_spec(&self) -> Option<SortSpec> {
        let field = self.field.as_deref()?;
        if is_client_sorted(field) {
            return None;
        }
        Some(SortSpec {
            field: field.to_string(),
            order: self.order,
        })
    }

    pub fn is_client_side(&self) -> bool {
        self.field.as_deref().is_some_and(is_client_sorted)
    }
}

/// Reorders one fetched page by status.
///
/// Ascending puts shipped ("1") rows first, descending puts stored and
/// unknown rows first; the order inside each group is kept.
pub fn sort_by_status(products: &mut [Product], order: SortOrder) {
    let rank = |p: &Product| u8::from(p.current_status.as_deref() != Some("1"));
    if order.is_ascending() {
        products.sort_by_key(rank);
    } else {
        products.sort_by_key(|p| std::cmp::Reverse(rank(p)));
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageSnapshot {
    pub products: Vec<Product>,
    pub total_pages: usize,
    pub page: usize,
}

/// Fetches the page for `(search, requested_page, sort)` together with the
/// page count.
///
/// When the caller already knows the page count the request is clamped
/// first. If the backend rejects the page because the result set shrank
/// (HTTP 404), the load is retried once on the clamped page.
pub async fn load_page<G: ProductGateway>(
    gateway: &G,
    search: &str,
    requested_page: i64,
    sort: &SortState,
    known_total: Option<usize>,
) -> Result<PageSnapshot, ApiError> {
    let mut page = match known_total {
        Some(total) => clamp_page(requested_page, total),
        None => requested_page.max(1) as usize,
    };

    let mut retried = false;
    loop {
        let query = PageQuery::new(search, page).with_sort(sort.backend_spec());
        let result = futures::try_join!(
            gateway.fetch_page(&query),
            gateway.fetch_total_pages(search)
        );

        match result {
            Ok((listing, total_pages)) => {
                let mut products = listing.results;
                if sort.is_client_side() {
                    sort_by_status(&mut products, sort.order);
                }
                return Ok(PageSnapshot {
                    products,
                    total_pages,
                    page: clamp_page(page as i64, total_pages),
                });
            }
            Err(e) if e.status() == Some(404) && page > 1 && !retried => {
                retried = true;
                let total = gateway.fetch_total_pages(search).await?;
                let clamped = clamp_page(page as i64, total);
                log::debug!("Page {} no longer exists, loading page {}", page, clamped);
                if clamped == page {
                    return Err(e);
                }
                page = clamped;
            }
            Err(e) => {
                log::error!("Failed to load products page {}: {}", page, e);
                return Err(e);
            }
        }
    }
}

/// Collects the ids of every page for `search`, one page at a time.
///
/// Each fetched page is handed to `on_page` (the caller refreshes its
/// product cache there). Ids are de-duplicated keeping first occurrence.
pub async fn select_all_across_pages<G, F>(
    gateway: &G,
    search: &str,
    total_pages: usize,
    mut on_page: F,
) -> Result<Vec<String>, ApiError>
where
    G: ProductGateway,
    F: FnMut(&[Product]),
{
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for page in 1..=total_pages {
        let listing = gateway.fetch_page(&PageQuery::new(search, page)).await?;
        on_page(&listing.results);
        for product in listing.results {
            if seen.insert(product.id.clone()) {
                ids.push(product.id);
            }
        }
    }
    log::debug!("Selected {} products across {} pages", ids.len(), total_pages);
    Ok(ids)
}

/// Header counters over the whole result set of a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InventoryCounts {
    pub total: usize,
    pub ssd_large: usize,
    pub ram: usize,
    pub ssd_chip: usize,
}

impl InventoryCounts {
    pub fn of(products: &[Product]) -> Self {
        let mut counts = Self {
            total: products.len(),
            ..Self::default()
        };
        for product in products {
            match product.category_kind() {
                ProductCategory::SsdLarge => counts.ssd_large += 1,
                ProductCategory::Ram => counts.ram += 1,
                ProductCategory::SsdChip => counts.ssd_chip += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Counts every product matching `search`.
pub async fn load_counts<G: ProductGateway>(gateway: &G, search: &str) -> Result<InventoryCounts, ApiError> {
    let products = gateway.fetch_all(search, &[]).await?;
    Ok(InventoryCounts::of(&products))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::fake::{product, FakeGateway};
    use futures::executor::block_on;

    fn ids_of(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_toggle() {
        let mut sort = SortState::default();
        sort.toggle("barcode");
        assert_eq!(sort.field_name(), "barcode");
        assert_eq!(sort.order, SortOrder::Asc);

        sort.toggle("barcode");
        assert_eq!(sort.order, SortOrder::Desc);

        sort.toggle("date");
        assert_eq!(sort.field_name(), "date");
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_status_sort_is_never_sent_to_backend() {
        let mut sort = SortState::default();
        assert_eq!(sort.backend_spec(), None);

        sort.toggle(CLIENT_SORTED_FIELD);
        assert!(sort.is_client_side());
        assert_eq!(sort.backend_spec(), None);

        sort.toggle("so_number");
        assert_eq!(
            sort.backend_spec(),
            Some(SortSpec {
                field: "so_number".into(),
                order: SortOrder::Asc
            })
        );
    }

    #[test]
    fn test_status_sort_is_stable() {
        let mut rows = vec![
            product("a", Some("1")),
            product("b", Some("0")),
            product("c", Some("1")),
            product("d", None),
        ];
        sort_by_status(&mut rows, SortOrder::Asc);
        assert_eq!(ids_of(&rows), vec!["a", "c", "b", "d"]);

        sort_by_status(&mut rows, SortOrder::Desc);
        assert_eq!(ids_of(&rows), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_load_page_clamps_against_known_total() {
        let gateway = FakeGateway::with_pages(vec![
            vec![product("1", Some("0"))],
            vec![product("2", Some("0"))],
        ]);
        let snapshot = block_on(load_page(&gateway, "", 9, &SortState::default(), Some(2))).unwrap();
        assert_eq!(snapshot.page, 2);
        assert_eq!(snapshot.total_pages, 2);
        assert_eq!(ids_of(&snapshot.products), vec!["2"]);
        assert_eq!(gateway.queries.borrow()[0].page, 2);
    }

    #[test]
    fn test_load_page_with_empty_result_uses_page_one() {
        let gateway = FakeGateway::with_pages(vec![vec![]]);
        let snapshot = block_on(load_page(&gateway, "x", -4, &SortState::default(), Some(0))).unwrap();
        assert_eq!(snapshot.page, 1);
        assert_eq!(gateway.queries.borrow()[0].page, 1);
    }

    #[test]
    fn test_load_page_sorts_status_locally() {
        let gateway = FakeGateway::with_pages(vec![vec![
            product("1", Some("0")),
            product("2", Some("1")),
            product("3", Some("0")),
        ]]);
        let mut sort = SortState::default();
        sort.toggle(CLIENT_SORTED_FIELD);

        let snapshot = block_on(load_page(&gateway, "", 1, &sort, None)).unwrap();
        assert_eq!(ids_of(&snapshot.products), vec!["2", "1", "3"]);
        assert!(gateway.queries.borrow()[0].sort.is_none());
    }

    #[test]
    fn test_load_page_fails_as_a_unit() {
        let gateway = FakeGateway::with_pages(vec![vec![product("1", Some("0"))]]);
        gateway.fail_total.set(true);
        let result = block_on(load_page(&gateway, "", 1, &SortState::default(), None));
        assert_eq!(result.unwrap_err().status(), Some(500));

        gateway.fail_total.set(false);
        gateway.fail_page.set(true);
        let result = block_on(load_page(&gateway, "", 1, &SortState::default(), None));
        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[test]
    fn test_load_page_recovers_when_result_set_shrinks() {
        let gateway = FakeGateway::with_pages(vec![
            vec![product("1", Some("0"))],
            vec![product("2", Some("0"))],
        ]);
        // caller still believes there are 3 pages
        let snapshot = block_on(load_page(&gateway, "", 3, &SortState::default(), Some(3))).unwrap();
        assert_eq!(snapshot.page, 2);
        assert_eq!(ids_of(&snapshot.products), vec!["2"]);
    }

    #[test]
    fn test_select_all_across_pages() {
        let gateway = FakeGateway::with_pages(vec![
            vec![product("1", Some("0")), product("2", Some("1"))],
            vec![product("3", Some("0")), product("2", Some("1"))],
            vec![product("4", Some("0"))],
        ]);
        let mut seen_pages = 0;
        let ids = block_on(select_all_across_pages(&gateway, "", 3, |_| seen_pages += 1)).unwrap();

        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(seen_pages, 3);
        let pages: Vec<usize> = gateway.queries.borrow().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_select_all_stops_on_failure() {
        let gateway = FakeGateway::with_pages(vec![vec![product("1", Some("0"))]]);
        let result = block_on(select_all_across_pages(&gateway, "", 2, |_| {}));
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[test]
    fn test_inventory_counts() {
        let mut rows = vec![
            product("1", Some("0")),
            product("2", Some("0")),
            product("3", Some("1")),
            product("4", None),
        ];
        rows[0].category = "1".into();
        rows[1].category = "2".into();
        rows[2].category = "3".into();
        rows[3].category = "2".into();

        assert_eq!(
            InventoryCounts::of(&rows),
            InventoryCounts {
                total: 4,
                ssd_large: 1,
                ram: 2,
                ssd_chip: 1
            }
        );
    }
}
