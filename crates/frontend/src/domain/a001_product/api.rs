//! Remote data gateway for products.
//!
//! The list/selection state machine talks to the backend through the
//! [`ProductGateway`] trait only; [`HttpProductGateway`] is the `gloo-net`
//! implementation used by the running app.

use std::fmt;

use contracts::domain::a001_product::{
    BatchStatusRequest, BatchStatusResponse, CreateProductsResponse, Product, ProductForm,
};
use contracts::shared::{total_pages, PageQuery, Paginated};
use futures::future::join_all;
use gloo_net::http::Request;
use web_sys::{File, FormData};

use crate::shared::api_utils::{api_url, authorized, ensure_ok, read_json, with_query};
use crate::shared::config::config;
use crate::shared::error::ApiError;

const PRODUCTS_PATH: &str = "/product/products/";
const EXPORT_PATH: &str = "/product/export/";
const BATCH_STATUS_PATH: &str = "/product/batch_update_status/";

#[allow(async_fn_in_trait)]
pub trait ProductGateway {
    /// One backend page for `query`
    async fn fetch_page(&self, query: &PageQuery) -> Result<Paginated<Product>, ApiError>;

    /// Number of pages the backend holds for `search`
    async fn fetch_total_pages(&self, search: &str) -> Result<usize, ApiError>;

    /// Every matching product, unpaginated
    async fn fetch_all(&self, search: &str, categories: &[String]) -> Result<Vec<Product>, ApiError>;

    async fn delete_product(&self, id: &str) -> Result<(), ApiError>;

    async fn batch_update_status(
        &self,
        request: &BatchStatusRequest,
    ) -> Result<BatchStatusResponse, ApiError>;
}

/// A bulk delete in which at least one id could not be removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFailure {
    /// Ids no longer on the backend, removed now or earlier
    pub deleted: Vec<String>,
    /// First failure, naming its id
    pub error: ApiError,
}

impl fmt::Display for DeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Deletes every id concurrently; fails as a whole if any deletion fails.
///
/// A 404 means the product is already gone and counts as deleted.
pub async fn delete_products<G: ProductGateway>(gateway: &G, ids: &[String]) -> Result<(), DeleteFailure> {
    let results = join_all(ids.iter().map(|id| async move { (id, gateway.delete_product(id).await) })).await;

    let mut deleted = Vec::new();
    let mut error = None;
    for (id, result) in results {
        match result {
            Ok(()) => deleted.push(id.clone()),
            Err(e) if e.status() == Some(404) => {
                log::warn!("Product {} was already deleted", id);
                deleted.push(id.clone());
            }
            Err(e) => {
                log::error!("Failed to delete product {}: {}", id, e);
                if error.is_none() {
                    error = Some(match e {
                        ApiError::Http { status, .. } => ApiError::Http {
                            status,
                            message: format!("Failed to delete product {} (HTTP {})", id, status),
                        },
                        other => other,
                    });
                }
            }
        }
    }

    match error {
        None => Ok(()),
        Some(error) => Err(DeleteFailure { deleted, error }),
    }
}

/// Load a single product by id
pub async fn fetch_product(id: &str) -> Result<Product, ApiError> {
    let url = with_query(&api_url(PRODUCTS_PATH)?, &[("id", id)]);
    let response = authorized(Request::get(&url)).send().await?;
    let page: Paginated<Product> = read_json(response, "Failed to fetch product").await?;
    page.results.into_iter().next().ok_or_else(|| ApiError::Http {
        status: 404,
        message: format!("Product {} not found", id),
    })
}

/// Create a batch of products in one request.
///
/// The backend answers 201 when every row was stored and 207 when only some
/// were; both come back as `Ok` and [`CreateProductsResponse::is_partial`]
/// tells them apart.
pub async fn create_products(forms: &[ProductForm]) -> Result<CreateProductsResponse, ApiError> {
    validate_all(forms)?;
    let forms: Vec<ProductForm> = forms.iter().cloned().map(ProductForm::normalized).collect();

    let response = authorized(Request::post(&api_url(PRODUCTS_PATH)?))
        .json(&forms)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await?;
    read_json(response, "Failed to create products").await
}

/// Create one product with photo attachments (multipart)
pub async fn create_product_with_photos(
    form: &ProductForm,
    photos: &[File],
) -> Result<CreateProductsResponse, ApiError> {
    validate_all(std::slice::from_ref(form))?;
    let data = multipart(&form.clone().normalized(), photos, &[])?;

    let response = authorized(Request::post(&api_url(PRODUCTS_PATH)?))
        .body(data)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await?;
    read_json(response, "Failed to create product").await
}

/// Update a product; switches to multipart when photos are added or removed.
pub async fn update_product(
    id: &str,
    form: &ProductForm,
    new_photos: &[File],
    delete_photo_ids: &[String],
) -> Result<Product, ApiError> {
    validate_all(std::slice::from_ref(form))?;
    let form = form.clone().normalized();
    let url = api_url(&format!("{}{}/", PRODUCTS_PATH, id))?;

    let builder = authorized(Request::put(&url));
    let request = if new_photos.is_empty() && delete_photo_ids.is_empty() {
        builder.json(&form)
    } else {
        builder.body(multipart(&form, new_photos, delete_photo_ids)?)
    }
    .map_err(|e| ApiError::Parse(e.to_string()))?;

    let response = request.send().await?;
    read_json(response, "Failed to update product").await
}

fn validate_all(forms: &[ProductForm]) -> Result<(), ApiError> {
    for form in forms {
        if let Err(missing) = form.validate() {
            return Err(ApiError::Validation(
                missing.into_iter().map(str::to_string).collect(),
            ));
        }
    }
    Ok(())
}

fn multipart(form: &ProductForm, photos: &[File], delete_photo_ids: &[String]) -> Result<FormData, ApiError> {
    let js_err = |e: wasm_bindgen::JsValue| ApiError::Parse(format!("{:?}", e));

    let data = FormData::new().map_err(js_err)?;
    for (name, value) in form.to_form_fields() {
        data.append_with_str(name, &value).map_err(js_err)?;
    }
    for photo in photos {
        data.append_with_blob_and_filename("photos", photo, &photo.name())
            .map_err(js_err)?;
    }
    for id in delete_photo_ids {
        data.append_with_str("delete_photo_ids", id).map_err(js_err)?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_product::fake::FakeGateway;
    use futures::executor::block_on;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_delete_products_reports_what_was_removed() {
        let gateway = FakeGateway::default();
        gateway.deleted.borrow_mut().push("1".to_string());
        gateway.fail_delete.borrow_mut().insert("3".to_string());

        let failure = block_on(delete_products(&gateway, &ids(&["1", "2", "3"]))).unwrap_err();
        assert_eq!(failure.deleted, ids(&["1", "2"]));
        assert_eq!(failure.error.status(), Some(500));
        assert!(failure.to_string().contains("product 3"));
    }

    #[test]
    fn test_delete_products_all_gone() {
        let gateway = FakeGateway::default();
        assert_eq!(block_on(delete_products(&gateway, &ids(&["4", "5"]))), Ok(()));
    }
}
