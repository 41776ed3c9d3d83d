use crate::domain::common::{id_string, text};
use serde::{Deserialize, Serialize};

/// Shipping method offered by the searchable cargo select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
}

impl Cargo {
    /// Case-insensitive substring match used by the select's search box.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty() || self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        let c: Cargo = serde_json::from_str(r#"{"id": 2, "name": "Sea Freight"}"#).unwrap();
        assert_eq!(c.id, "2");
        assert!(c.matches("freight"));
        assert!(c.matches(""));
        assert!(!c.matches("air"));
    }
}
