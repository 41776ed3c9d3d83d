use serde::{Deserialize, Serialize};

use super::aggregate::Product;
use super::status::ProductStatus;

/// Body of `POST /product/batch_update_status/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatusRequest {
    pub ids: Vec<String>,
    pub current_status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated_count: u64,
}

/// Response of the bulk create endpoint.
///
/// The backend answers 201 when every row was created and 207 when only
/// some of them were; `errors` then lists the rejected rows verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub created_count: usize,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub created_products: Vec<Product>,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl CreateProductsResponse {
    pub fn is_partial(&self) -> bool {
        self.created_count < self.total_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_request_omits_missing_date() {
        let req = BatchStatusRequest {
            ids: vec!["1".into(), "2".into()],
            current_status: ProductStatus::Stored,
            ex_date: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["current_status"], "0");
        assert!(json.get("ex_date").is_none());
    }

    #[test]
    fn test_partial_create_response() {
        let resp: CreateProductsResponse = serde_json::from_str(
            r#"{"success": false, "created_count": 1, "total_count": 2,
                "created_products": [{"id": 3}],
                "errors": [{"errors": {"so_number": ["This field is required."]}}]}"#,
        )
        .unwrap();
        assert!(resp.is_partial());
        assert_eq!(resp.created_products[0].id, "3");
        assert_eq!(resp.errors.len(), 1);
    }
}
