use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregate::Product;

/// Create/update payload for a single product.
///
/// Serialized as JSON for plain submissions; [`ProductForm::to_form_fields`]
/// gives the multipart field list used when photos are attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductForm {
    pub number: String,
    pub so_number: String,
    pub barcode: String,
    pub qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex_date: Option<String>,
    pub vender: String,
    pub client: String,
    pub category: String,
    pub noted: String,
    pub current_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
}

impl ProductForm {
    /// Names of required fields that are blank or malformed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.so_number.trim().is_empty() {
            missing.push("so_number");
        }
        if self.barcode.trim().is_empty() {
            missing.push("barcode");
        }
        if NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").is_err() {
            missing.push("date");
        }
        missing
    }

    /// Checks required fields before anything is sent to the backend.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    /// Trims text inputs the same way the backend does before saving.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.number,
            &mut self.so_number,
            &mut self.barcode,
            &mut self.date,
            &mut self.vender,
            &mut self.client,
            &mut self.category,
            &mut self.noted,
            &mut self.current_status,
        ] {
            *field = field.trim().to_string();
        }
        self.ex_date = self
            .ex_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn to_form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("number", self.number.clone()),
            ("so_number", self.so_number.clone()),
            ("barcode", self.barcode.clone()),
            ("qty", self.qty.to_string()),
            ("date", self.date.clone()),
            ("vender", self.vender.clone()),
            ("client", self.client.clone()),
            ("category", self.category.clone()),
            ("noted", self.noted.clone()),
            ("current_status", self.current_status.clone()),
        ];
        if let Some(weight) = self.weight {
            fields.push(("weight", weight.to_string()));
        }
        if let Some(ex_date) = &self.ex_date {
            fields.push(("ex_date", ex_date.clone()));
        }
        if let Some(cargo) = &self.cargo {
            fields.push(("cargo", cargo.clone()));
        }
        fields
    }
}

impl From<&Product> for ProductForm {
    fn from(p: &Product) -> Self {
        Self {
            number: p.number.clone(),
            so_number: p.so_number.clone(),
            barcode: p.barcode.clone(),
            qty: p.qty,
            weight: p.weight,
            date: p.date.clone(),
            ex_date: p.ex_date.clone(),
            vender: p.vender.clone(),
            client: p.client.clone(),
            category: p.category.clone(),
            noted: p.noted.clone(),
            current_status: p.current_status.clone().unwrap_or_default(),
            cargo: p.cargo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            so_number: "SO-1".into(),
            barcode: "BC-1".into(),
            date: "2025-06-30".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_form_has_no_missing_fields() {
        assert!(filled().missing_fields().is_empty());
    }

    #[test]
    fn test_required_fields_are_reported() {
        let form = ProductForm {
            so_number: "  ".into(),
            date: "30/06/2025".into(),
            ..filled()
        };
        assert_eq!(form.missing_fields(), vec!["so_number", "date"]);
        assert_eq!(
            ProductForm::default().missing_fields(),
            vec!["so_number", "barcode", "date"]
        );
    }

    #[test]
    fn test_validate_rejects_missing_barcode() {
        let form = ProductForm {
            barcode: String::new(),
            ..filled()
        };
        assert_eq!(form.validate(), Err(vec!["barcode"]));
        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn test_normalized_trims_and_drops_blank_ship_date() {
        let form = ProductForm {
            so_number: " SO-9 ".into(),
            ex_date: Some(" ".into()),
            ..filled()
        }
        .normalized();
        assert_eq!(form.so_number, "SO-9");
        assert_eq!(form.ex_date, None);
    }

    #[test]
    fn test_form_fields_include_optional_values_only_when_set() {
        let fields = filled().to_form_fields();
        assert!(fields.iter().all(|(k, _)| *k != "weight" && *k != "cargo"));

        let fields = ProductForm {
            weight: Some(12),
            cargo: Some("4".into()),
            ..filled()
        }
        .to_form_fields();
        assert!(fields.contains(&("weight", "12".to_string())));
        assert!(fields.contains(&("cargo", "4".to_string())));
    }
}
