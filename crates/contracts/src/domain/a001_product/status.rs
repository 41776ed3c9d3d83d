use serde::{Deserialize, Serialize};

/// Lifecycle flag of a product.
///
/// The backend stores it as a free-form text column; only `"0"` and `"1"`
/// are meaningful, everything else is treated as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductStatus {
    /// Received into the warehouse (入庫)
    #[serde(rename = "0")]
    Stored,
    /// Shipped out (出貨)
    #[serde(rename = "1")]
    Shipped,
}

impl ProductStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ProductStatus::Stored => "0",
            ProductStatus::Shipped => "1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::Stored => "入庫",
            ProductStatus::Shipped => "出貨",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(ProductStatus::Stored),
            "1" => Some(ProductStatus::Shipped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(ProductStatus::parse("0"), Some(ProductStatus::Stored));
        assert_eq!(ProductStatus::parse(" 1 "), Some(ProductStatus::Shipped));
        assert_eq!(ProductStatus::parse(""), None);
        assert_eq!(ProductStatus::parse("2"), None);
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&ProductStatus::Shipped).unwrap(), "\"1\"");
        let s: ProductStatus = serde_json::from_str("\"0\"").unwrap();
        assert_eq!(s, ProductStatus::Stored);
    }
}
