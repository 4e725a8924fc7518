pub mod toml_config;

use crate::domain::model::{Category, PriceRange, MAX_PRICE_LEVEL};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, validate_range};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::adapters::DEFAULT_PLACES_ENDPOINT;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_socket_addr, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::time::Duration;

pub const API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nearby-places")]
#[command(about = "Nearby points of interest, ranked by popularity")]
pub struct CliConfig {
    /// Optional TOML configuration file; replaces the flags below when given
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_PLACES_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream request timeout; the transport default applies when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_socket_addr("bind", &self.bind)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}

/// Returns the usable credential, treating blanks and unresolved `${VAR}`
/// placeholders as absent.
pub fn resolve_api_key(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim();
    if key.is_empty() || (key.starts_with("${") && key.ends_with('}')) {
        return None;
    }
    Some(key.to_string())
}

/// Values the request handler falls back to when a parameter is absent or unparsable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub radius: u32,
    pub types: Vec<String>,
    pub minprice: u8,
    pub maxprice: u8,
    pub limit: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius: 1000,
            types: vec!["restaurant".to_string()],
            minprice: 0,
            maxprice: MAX_PRICE_LEVEL,
            limit: 30,
        }
    }
}

impl SearchDefaults {
    pub fn categories(&self) -> Vec<Category> {
        self.types.iter().map(|t| Category::new(t.trim())).collect()
    }

    pub fn price(&self) -> PriceRange {
        PriceRange::clamped(self.minprice as i64, self.maxprice as i64).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            validate_non_empty_string("defaults.types", "")?;
        }
        for t in &self.types {
            validate_non_empty_string("defaults.types", t)?;
        }
        validate_range("defaults.minprice", self.minprice, 0, MAX_PRICE_LEVEL)?;
        validate_range("defaults.maxprice", self.maxprice, self.minprice, MAX_PRICE_LEVEL)?;
        validate_positive_number("defaults.limit", self.limit as u64, 1)?;
        Ok(())
    }
}
