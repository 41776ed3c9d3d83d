//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and turning
//! responses into `Result<_, ApiError>`.

use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::shared::config::config;
use crate::shared::error::ApiError;
use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// # Returns
/// - Configured backend URL without a trailing slash
/// - `ApiError::Config` when no URL is configured
pub fn api_base() -> Result<String, ApiError> {
    config().api.base_url().map(str::to_string)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/product/products/")?;
/// ```
pub fn api_url(path: &str) -> Result<String, ApiError> {
    Ok(format!("{}{}", api_base()?, path))
}

/// Append URL-encoded query pairs to `url`.
pub fn with_query<K, V>(url: &str, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if pairs.is_empty() {
        return url.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", url, query)
}

/// Adds the bearer token when the user is logged in.
pub fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

/// Fails with a descriptive [`ApiError`] unless the response is 2xx.
pub async fn ensure_ok(response: Response, context: &str) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::error!("{} (HTTP {}): {}", context, status, body);
    Err(ApiError::http(status, &body, context))
}

/// Checks the status, then decodes the JSON body.
pub async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, ApiError> {
    let response = ensure_ok(response, context).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_values() {
        let url = with_query("http://h/product/products/", &[("search", "SO 1&2"), ("page", "3")]);
        assert_eq!(url, "http://h/product/products/?search=SO%201%262&page=3");
    }

    #[test]
    fn test_with_query_without_pairs() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(with_query("http://h/x/", &pairs), "http://h/x/");
    }
}
