use contracts::system::auth::{TokenRequest, TokenResponse};
use gloo_net::http::Request;

use crate::shared::api_utils::{api_url, read_json};
use crate::shared::error::ApiError;

/// Exchange credentials for a bearer token
pub async fn obtain_token(username: String, password: String) -> Result<TokenResponse, ApiError> {
    if username.trim().is_empty() || password.is_empty() {
        let mut missing = Vec::new();
        if username.trim().is_empty() {
            missing.push("username".to_string());
        }
        if password.is_empty() {
            missing.push("password".to_string());
        }
        return Err(ApiError::Validation(missing));
    }

    let request = TokenRequest { username, password };

    let response = Request::post(&api_url("/api/token/")?)
        .json(&request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await?;

    read_json(response, "Failed to obtain access token").await
}
