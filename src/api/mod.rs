pub mod categories;
pub mod places;

use crate::config::{resolve_api_key, SearchDefaults};
use crate::core::{ConfigProvider, PlacesSource};
use crate::adapters::GooglePlacesClient;
use crate::utils::error::{PlacesError, Result};
use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PlacesSource>,
    pub api_key: Option<String>,
    pub defaults: Arc<SearchDefaults>,
}

impl AppState {
    pub fn new(source: Arc<dyn PlacesSource>, api_key: Option<String>) -> Self {
        Self {
            source,
            api_key,
            defaults: Arc::new(SearchDefaults::default()),
        }
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    /// Builds the Google-backed state. A missing key is not an error here;
    /// each request reports it instead.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = GooglePlacesClient::from_config(config)?;
        tracing::info!("🌐 Places endpoint: {}", client.endpoint());
        let api_key = resolve_api_key(config.api_key());
        if api_key.is_none() {
            tracing::warn!("⚠️ No Google Places API key configured; searches will fail");
        }
        Ok(Self::new(Arc::new(client), api_key))
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/google-places", get(places::google_places))
        .route("/categories", get(categories::list_categories))
        .with_state(state)
}

impl IntoResponse for PlacesError {
    fn into_response(self) -> Response {
        match &self {
            PlacesError::MissingApiKey => tracing::warn!("Rejecting search: {}", self),
            other => tracing::error!(
                "❌ Places handler error: {} (Category: {:?}, Severity: {:?})",
                other,
                other.category(),
                other.severity()
            ),
        }

        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
