use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::shared::error::ApiError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub timeout_secs: u64,
    pub large_timeout_secs: u64,
    pub large_threshold: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub message_hide_ms: u32,
}

fn default_page_size() -> usize {
    contracts::shared::DEFAULT_PAGE_SIZE
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            large_timeout_secs: 180,
            large_threshold: 100,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            message_hide_ms: 5000,
        }
    }
}

impl ApiConfig {
    /// Backend base URL without a trailing slash.
    pub fn base_url(&self) -> Result<&str, ApiError> {
        let url = self.base_url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ApiError::Config("API URL is not set".to_string()));
        }
        Ok(url)
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = ""
page_size = 100

[export]
timeout_secs = 120
large_timeout_secs = 180
large_threshold = 100

[ui]
message_hide_ms = 5000
"#;

/// Parses a configuration document, letting `base_url_override` replace
/// the configured backend URL.
pub fn parse_config(raw: &str, base_url_override: Option<&str>) -> Result<AppConfig, toml::de::Error> {
    let mut config: AppConfig = toml::from_str(raw)?;
    if let Some(url) = base_url_override.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
    Ok(config)
}

/// Loads the embedded configuration.
///
/// `WAREHOUSE_API_URL` set at build time overrides `api.base_url`.
pub fn load_config() -> AppConfig {
    let override_url = option_env!("WAREHOUSE_API_URL");
    match parse_config(DEFAULT_CONFIG, override_url) {
        Ok(config) => {
            if config.api.base_url.is_empty() {
                log::warn!("api.base_url is empty; backend calls will fail until WAREHOUSE_API_URL is set");
            } else {
                log::info!("Using backend at {}", config.api.base_url);
            }
            config
        }
        Err(e) => {
            log::error!("Embedded configuration is invalid: {}", e);
            AppConfig {
                api: ApiConfig {
                    base_url: override_url.unwrap_or_default().to_string(),
                    page_size: default_page_size(),
                },
                export: ExportConfig::default(),
                ui: UiConfig::default(),
            }
        }
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(load_config);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG, None).unwrap();
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.export.timeout_secs, 120);
        assert_eq!(config.export.large_timeout_secs, 180);
        assert_eq!(config.ui.message_hide_ms, 5000);
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let config = parse_config(DEFAULT_CONFIG, None).unwrap();
        let err = config.api.base_url().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_override_and_trailing_slash() {
        let config = parse_config(DEFAULT_CONFIG, Some("http://10.0.0.5:8000/")).unwrap();
        assert_eq!(config.api.base_url().unwrap(), "http://10.0.0.5:8000");

        let config = parse_config(DEFAULT_CONFIG, Some("   ")).unwrap();
        assert!(config.api.base_url().is_err());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = parse_config("[api]\nbase_url = \"http://x\"\n", None).unwrap();
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.export.large_threshold, 100);
    }
}
