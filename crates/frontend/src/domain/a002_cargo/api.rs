use contracts::domain::a002_cargo::Cargo;
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, authorized, read_json};
use crate::shared::error::ApiError;

/// Fetch all cargo options
pub async fn fetch_cargos() -> Result<Vec<Cargo>, ApiError> {
    let response = authorized(Request::get(&api_url("/product/cargos/")?))
        .send()
        .await?;
    read_json(response, "Failed to fetch cargos").await
}
