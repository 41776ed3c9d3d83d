//! Create and edit forms.
//!
//! The staging and photo rules live here as plain functions; the
//! components in [`create`] and [`edit`] only wire them to inputs.

pub mod create;
pub mod edit;
mod fields;

use contracts::domain::a001_product::{CreateProductsResponse, Photo, ProductCategory, ProductForm};

/// Photos a product may carry, existing and new together
pub const MAX_PHOTOS: usize = 10;

/// Human label of a required field
pub fn field_label(field: &str) -> &'static str {
    match field {
        "so_number" => "SO Number",
        "barcode" => "Barcode",
        "date" => "Date (YYYY-MM-DD)",
        _ => "Unknown field",
    }
}

/// Alert lines for a failed validation
pub fn validation_lines(missing: &[&str]) -> Vec<String> {
    missing
        .iter()
        .map(|field| format!("{} 為必填欄位", field_label(field)))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct StagedRow {
    /// Local key for list rendering
    pub key: u64,
    pub form: ProductForm,
}

/// Products entered on the create screen, waiting to be submitted together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StagedBatch {
    rows: Vec<StagedRow>,
    next_key: u64,
}

impl StagedBatch {
    pub fn rows(&self) -> &[StagedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Adds a validated copy of `form`.
    pub fn add(&mut self, form: &ProductForm) -> Result<(), Vec<&'static str>> {
        form.validate()?;
        self.next_key += 1;
        self.rows.push(StagedRow {
            key: self.next_key,
            form: form.clone().normalized(),
        });
        Ok(())
    }

    pub fn remove(&mut self, key: u64) {
        self.rows.retain(|row| row.key != key);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn forms(&self) -> Vec<ProductForm> {
        self.rows.iter().map(|row| row.form.clone()).collect()
    }

    /// SSD rows, large and chip alike
    pub fn ssd_count(&self) -> usize {
        self.count_where(|c| matches!(c, ProductCategory::SsdLarge | ProductCategory::SsdChip))
    }

    pub fn ram_count(&self) -> usize {
        self.count_where(|c| c == ProductCategory::Ram)
    }

    fn count_where(&self, pred: impl Fn(ProductCategory) -> bool) -> usize {
        self.rows
            .iter()
            .filter(|row| pred(ProductCategory::from_code(&row.form.category)))
            .count()
    }
}

/// The form after a row was staged: per-unit fields are cleared, the
/// shared ones (date, vendor, client, SO) stay for the next entry.
pub fn next_entry(form: &ProductForm) -> ProductForm {
    ProductForm {
        number: String::new(),
        barcode: String::new(),
        qty: 0,
        weight: None,
        category: ProductCategory::Unassigned.code().to_string(),
        noted: String::new(),
        ..form.clone()
    }
}

/// Message for a create response; partial success names how many rows made it.
pub fn create_summary(response: &CreateProductsResponse) -> (bool, String) {
    if response.total_count > 0 && response.is_partial() {
        (
            false,
            format!(
                "部分產品建立失敗: 已建立 {}/{} 筆",
                response.created_count, response.total_count
            ),
        )
    } else {
        let count = response.created_count.max(response.created_products.len());
        (true, format!("已建立 {} 筆產品", count))
    }
}

/// Absolute URL of a stored photo; relative paths hang off the API host.
pub fn photo_url(api_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}/{}", api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn photo_file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path).trim()
}

/// Which of the `incoming` files (name, size) may be added.
///
/// A file already attached (same name as an existing photo, or same name
/// and size as a staged one) rejects the whole pick. Otherwise files are
/// taken in order until [`MAX_PHOTOS`] is reached.
pub fn accept_new_photos(
    existing: &[Photo],
    staged: &[(String, f64)],
    incoming: &[(String, f64)],
) -> Result<Vec<usize>, String> {
    let existing_names: Vec<&str> = existing.iter().map(|p| photo_file_name(&p.path)).collect();
    let mut keys: Vec<(String, f64)> = staged
        .iter()
        .map(|(name, size)| (name.trim().to_string(), *size))
        .collect();

    let mut accepted = Vec::new();
    for (index, (name, size)) in incoming.iter().enumerate() {
        let name = name.trim();
        let duplicate = existing_names.contains(&name)
            || keys.iter().any(|(n, s)| n == name && s == size);
        if duplicate {
            return Err(format!("圖片「{}」已存在，請勿重複選取。", name));
        }
        keys.push((name.to_string(), *size));
        accepted.push(index);
    }

    let room = MAX_PHOTOS.saturating_sub(existing.len() + staged.len());
    accepted.truncate(room);
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(barcode: &str, category: &str) -> ProductForm {
        ProductForm {
            so_number: "SO-1".into(),
            barcode: barcode.into(),
            date: "2025-07-01".into(),
            vender: "TGT".into(),
            category: category.into(),
            ..Default::default()
        }
    }

    fn photo(id: &str, path: &str) -> Photo {
        Photo {
            id: id.into(),
            path: path.into(),
        }
    }

    #[test]
    fn test_staged_batch_counts_and_removal() {
        let mut batch = StagedBatch::default();
        batch.add(&form("A", "1")).unwrap();
        batch.add(&form("B", "2")).unwrap();
        batch.add(&form("C", "3")).unwrap();
        assert_eq!(batch.ssd_count(), 2);
        assert_eq!(batch.ram_count(), 1);

        let first = batch.rows()[0].key;
        batch.remove(first);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.forms()[0].barcode, "B");
    }

    #[test]
    fn test_invalid_row_is_not_staged() {
        let mut batch = StagedBatch::default();
        assert_eq!(batch.add(&form("", "1")), Err(vec!["barcode"]));
        assert!(batch.is_empty());
        assert_eq!(validation_lines(&["barcode"]), vec!["Barcode 為必填欄位"]);
    }

    #[test]
    fn test_next_entry_keeps_shared_fields() {
        let mut f = form("A", "2");
        f.number = "N-1".into();
        f.qty = 4;
        let next = next_entry(&f);
        assert_eq!(next.barcode, "");
        assert_eq!(next.number, "");
        assert_eq!(next.qty, 0);
        assert_eq!(next.category, "0");
        assert_eq!(next.date, "2025-07-01");
        assert_eq!(next.vender, "TGT");
        assert_eq!(next.so_number, "SO-1");
    }

    #[test]
    fn test_create_summary_reports_partial_success() {
        let partial = CreateProductsResponse {
            created_count: 1,
            total_count: 3,
            ..Default::default()
        };
        assert_eq!(create_summary(&partial), (false, "部分產品建立失敗: 已建立 1/3 筆".to_string()));

        let full = CreateProductsResponse {
            success: true,
            created_count: 2,
            total_count: 2,
            ..Default::default()
        };
        assert_eq!(create_summary(&full), (true, "已建立 2 筆產品".to_string()));
    }

    #[test]
    fn test_duplicate_photo_rejects_pick() {
        let existing = vec![photo("1", "/media/SO-1_a.jpg")];
        let staged = vec![("b.jpg".to_string(), 10.0)];

        let err = accept_new_photos(&existing, &staged, &[("SO-1_a.jpg".into(), 5.0)]).unwrap_err();
        assert!(err.contains("SO-1_a.jpg"));
        assert!(accept_new_photos(&existing, &staged, &[("b.jpg".into(), 10.0)]).is_err());
        // same name, other size is a different file
        assert_eq!(accept_new_photos(&existing, &staged, &[("b.jpg".into(), 11.0)]), Ok(vec![0]));
    }

    #[test]
    fn test_photo_limit() {
        let existing: Vec<Photo> = (0..8).map(|i| photo(&i.to_string(), &format!("/m/{i}.jpg"))).collect();
        let incoming: Vec<(String, f64)> = (0..5).map(|i| (format!("new{i}.jpg"), 1.0)).collect();
        assert_eq!(accept_new_photos(&existing, &[], &incoming), Ok(vec![0, 1]));
    }

    #[test]
    fn test_photo_url() {
        assert_eq!(
            photo_url("http://api.local/", "/media/a.jpg"),
            "http://api.local/media/a.jpg"
        );
        assert_eq!(photo_url("http://api.local", "https://cdn/x.jpg"), "https://cdn/x.jpg");
    }
}
