use crate::adapters::DEFAULT_PLACES_ENDPOINT;
use crate::config::{SearchDefaults, DEFAULT_BIND_ADDRESS};
use crate::core::ConfigProvider;
use crate::utils::error::{PlacesError, Result};
use crate::utils::validation::{validate_positive_number, validate_socket_addr, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub defaults: SearchDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_PLACES_ENDPOINT.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlacesError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlacesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_PLACES_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlacesError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("places.endpoint", &self.places.endpoint)?;
        validate_socket_addr("server.bind", &self.server.bind)?;

        if let Some(timeout) = self.places.timeout_seconds {
            validate_positive_number("places.timeout_seconds", timeout, 1)?;
        }

        self.defaults.validate()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.places.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.places.api_key.as_deref()
    }

    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.places.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::resolve_api_key;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind = "0.0.0.0:8080"

[places]
endpoint = "https://places.example.com/nearby"
api_key = "literal-key"
timeout_seconds = 15

[defaults]
radius = 2500
types = ["cafe", "bakery"]
minprice = 1
maxprice = 3
limit = 10
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api_endpoint(), "https://places.example.com/nearby");
        assert_eq!(config.api_key(), Some("literal-key"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.defaults.radius, 2500);
        assert_eq!(config.defaults.types, vec!["cafe", "bakery"]);
        assert_eq!(config.defaults.limit, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.api_endpoint(), DEFAULT_PLACES_ENDPOINT);
        assert_eq!(config.api_key(), None);
        assert_eq!(config.defaults, SearchDefaults::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NEARBY_PLACES_TEST_KEY", "key-from-env");

        let toml_content = r#"
[places]
api_key = "${NEARBY_PLACES_TEST_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("key-from-env"));

        std::env::remove_var("NEARBY_PLACES_TEST_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_counts_as_missing_key() {
        let toml_content = r#"
[places]
api_key = "${NEARBY_PLACES_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("${NEARBY_PLACES_UNSET_VARIABLE}"));
        assert_eq!(resolve_api_key(config.api_key()), None);
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[server]
bind = "not-an-address"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[places]
endpoint = "invalid-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[defaults]
maxprice = 7
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[server]
bind = "127.0.0.1:4000"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[server\nbind = ");
        assert!(matches!(
            result,
            Err(PlacesError::ConfigValidationError { .. })
        ));
    }
}
