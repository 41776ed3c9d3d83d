use serde::{Deserialize, Serialize};

/// Page size of the backend's page-number pagination.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Page-number pagination envelope (`count`/`next`/`previous`/`results`).
///
/// The single-product lookup (`?id=`) answers with `results` only, so every
/// other field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

/// Parameters of one product-list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub search: String,
    /// 1-based
    pub page: usize,
    pub sort: Option<SortSpec>,
}

impl PageQuery {
    pub fn new(search: impl Into<String>, page: usize) -> Self {
        Self {
            search: search.into(),
            page,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Query-string pairs in the backend's naming.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs.push(("page", self.page.max(1).to_string()));
        if let Some(sort) = &self.sort {
            pairs.push(("sortField", sort.field.clone()));
            pairs.push(("sortOrder", sort.order.as_str().to_string()));
        }
        pairs
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (count + page_size - 1) / page_size
}

/// Clamps a requested 1-based page into `[1, total_pages]`.
///
/// With no pages at all the result is `1`.
pub fn clamp_page(requested: i64, total_pages: usize) -> usize {
    if total_pages == 0 {
        return 1;
    }
    let upper = total_pages as i64;
    requested.clamp(1, upper) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(7, 0), 1);
        assert_eq!(clamp_page(-3, 0), 1);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(-2, 5), 1);
        assert_eq!(clamp_page(3, 5), 3);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 100), 0);
        assert_eq!(total_pages(1, 100), 1);
        assert_eq!(total_pages(100, 100), 1);
        assert_eq!(total_pages(101, 100), 2);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_query_pairs() {
        let q = PageQuery::new("2025-03-01", 2).with_sort(Some(SortSpec {
            field: "barcode".into(),
            order: SortOrder::Desc,
        }));
        assert_eq!(
            q.to_query_pairs(),
            vec![
                ("search", "2025-03-01".to_string()),
                ("page", "2".to_string()),
                ("sortField", "barcode".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );
        assert_eq!(PageQuery::new("", 0).to_query_pairs(), vec![("page", "1".to_string())]);
    }

    #[test]
    fn test_paginated_without_count() {
        let page: Paginated<serde_json::Value> =
            serde_json::from_str(r#"{"results": [{"id": 1}]}"#).unwrap();
        assert_eq!(page.count, 0);
        assert_eq!(page.results.len(), 1);
        assert!(page.next.is_none());
    }
}
