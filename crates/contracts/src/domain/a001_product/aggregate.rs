use crate::domain::common::{id_string, opt_id_string, opt_text, text};
use serde::{Deserialize, Serialize};

use super::status::ProductStatus;

// ============================================================================
// Product
// ============================================================================

/// A physical inventory unit (SSD/RAM) as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    #[serde(default, deserialize_with = "text")]
    pub number: String,

    #[serde(default, deserialize_with = "text")]
    pub so_number: String,

    #[serde(default, deserialize_with = "text")]
    pub barcode: String,

    #[serde(default)]
    pub qty: i64,

    /// Intake date, `YYYY-MM-DD`
    #[serde(default, deserialize_with = "text")]
    pub date: String,

    /// Shipment date, set when the product goes out
    #[serde(default, deserialize_with = "opt_text")]
    pub ex_date: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub vender: String,

    #[serde(default, deserialize_with = "text")]
    pub client: String,

    #[serde(default, deserialize_with = "text")]
    pub category: String,

    #[serde(default)]
    pub weight: Option<i64>,

    #[serde(default, deserialize_with = "text")]
    pub noted: String,

    /// Raw status column; see [`Product::status`]
    #[serde(default, deserialize_with = "opt_id_string")]
    pub current_status: Option<String>,

    #[serde(default, deserialize_with = "opt_id_string")]
    pub cargo: Option<String>,

    #[serde(default)]
    pub photos: Vec<Photo>,

    #[serde(default, deserialize_with = "opt_id_string")]
    pub created_by: Option<String>,

    #[serde(default, deserialize_with = "opt_text")]
    pub created_by_username: Option<String>,
}

impl Product {
    pub fn status(&self) -> Option<ProductStatus> {
        self.current_status.as_deref().and_then(ProductStatus::parse)
    }

    pub fn category_kind(&self) -> ProductCategory {
        ProductCategory::from_code(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub path: String,
}

// ============================================================================
// Snapshot (browser-side cache entry)
// ============================================================================

/// Lightweight copy of a product kept in the all-products cache.
///
/// `current_status` is optional on the wire so that a corrupt entry can be
/// detected and dropped instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub current_status: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub number: String,
    #[serde(default, deserialize_with = "text")]
    pub so_number: String,
}

impl ProductSnapshot {
    pub fn status(&self) -> Option<ProductStatus> {
        self.current_status.as_deref().and_then(ProductStatus::parse)
    }

    pub fn is_valid(&self) -> bool {
        self.current_status.is_some()
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(p: &Product) -> Self {
        Self {
            current_status: p.current_status.clone(),
            number: p.number.clone(),
            so_number: p.so_number.clone(),
        }
    }
}

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Unassigned,
    SsdLarge,
    Ram,
    SsdChip,
    Other,
}

impl ProductCategory {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "" | "0" => ProductCategory::Unassigned,
            "1" => ProductCategory::SsdLarge,
            "2" => ProductCategory::Ram,
            "3" => ProductCategory::SsdChip,
            _ => ProductCategory::Other,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProductCategory::Unassigned => "0",
            ProductCategory::SsdLarge => "1",
            ProductCategory::Ram => "2",
            ProductCategory::SsdChip => "3",
            ProductCategory::Other => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Unassigned => "-",
            ProductCategory::SsdLarge => "SSD-大",
            ProductCategory::Ram => "RAM",
            ProductCategory::SsdChip => "SSD-顆",
            ProductCategory::Other => "?",
        }
    }

    /// Categories offered by the product forms.
    pub fn selectable() -> [ProductCategory; 4] {
        [
            ProductCategory::Unassigned,
            ProductCategory::SsdLarge,
            ProductCategory::Ram,
            ProductCategory::SsdChip,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_ROW: &str = r#"{
        "id": 1201,
        "number": "N-1",
        "so_number": "SO-77",
        "barcode": "BC123",
        "qty": 3,
        "date": "2025-03-01",
        "ex_date": null,
        "vender": "TGT",
        "client": null,
        "category": "2",
        "weight": null,
        "noted": "",
        "current_status": "0",
        "cargo": 4,
        "photos": [{"id": 9, "path": "/media/SO-77_1.jpg"}],
        "created_by": 2,
        "created_by_username": "ops"
    }"#;

    #[test]
    fn test_backend_row_deserializes() {
        let p: Product = serde_json::from_str(BACKEND_ROW).unwrap();
        assert_eq!(p.id, "1201");
        assert_eq!(p.client, "");
        assert_eq!(p.ex_date, None);
        assert_eq!(p.status(), Some(ProductStatus::Stored));
        assert_eq!(p.cargo.as_deref(), Some("4"));
        assert_eq!(p.photos[0].id, "9");
        assert_eq!(p.category_kind(), ProductCategory::Ram);
    }

    #[test]
    fn test_minimal_row_uses_defaults() {
        let p: Product = serde_json::from_str(r#"{"id": "5"}"#).unwrap();
        assert_eq!(p.id, "5");
        assert_eq!(p.current_status, None);
        assert!(p.photos.is_empty());
    }

    #[test]
    fn test_snapshot_validity() {
        let ok: ProductSnapshot = serde_json::from_str(r#"{"current_status": 1}"#).unwrap();
        assert!(ok.is_valid());
        assert_eq!(ok.status(), Some(ProductStatus::Shipped));

        let bad: ProductSnapshot = serde_json::from_str(r#"{"number": "x"}"#).unwrap();
        assert!(!bad.is_valid());
    }
}
