pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::GooglePlacesClient;
pub use api::AppState;
pub use config::toml_config::TomlConfig;
pub use core::aggregator::Aggregator;
pub use utils::error::{PlacesError, Result};
