use crate::utils::error::{PlacesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories the upstream service accepts `minprice`/`maxprice` for.
pub const PRICE_BEARING_CATEGORIES: [&str; 5] = ["restaurant", "food", "cafe", "bar", "bakery"];

pub const LODGING: &str = "lodging";

pub const MAX_PRICE_LEVEL: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `lat,lng` as the upstream `location` parameter expects it.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// A place-type tag, used both as a search filter and as a tag on returned places.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn accepts_price(&self) -> bool {
        PRICE_BEARING_CATEGORIES.contains(&self.0.as_str())
    }

    pub fn is_lodging(&self) -> bool {
        self.0 == LODGING
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u8,
    pub max: u8,
}

impl PriceRange {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        if max > MAX_PRICE_LEVEL {
            return Err(PlacesError::ValidationError {
                message: format!("price level {} exceeds {}", max, MAX_PRICE_LEVEL),
            });
        }
        if min > max {
            return Err(PlacesError::ValidationError {
                message: format!("minprice {} is greater than maxprice {}", min, max),
            });
        }
        Ok(Self { min, max })
    }

    /// Clamps both bounds into `0..=4`; `None` when they are reversed.
    pub fn clamped(min: i64, max: i64) -> Option<Self> {
        let clamp = |v: i64| v.clamp(0, MAX_PRICE_LEVEL as i64) as u8;
        let (min, max) = (clamp(min), clamp(max));
        (min <= max).then_some(Self { min, max })
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: MAX_PRICE_LEVEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub location: LatLng,
    /// Search radius in meters.
    pub radius: u32,
    pub categories: Vec<Category>,
    pub price: PriceRange,
    pub limit: usize,
}

impl Query {
    pub fn new(
        location: LatLng,
        radius: u32,
        categories: Vec<Category>,
        price: PriceRange,
        limit: usize,
    ) -> Result<Self> {
        if categories.is_empty() {
            return Err(PlacesError::ValidationError {
                message: "at least one category is required".to_string(),
            });
        }
        if limit == 0 {
            return Err(PlacesError::ValidationError {
                message: "limit must be at least 1".to_string(),
            });
        }
        // PriceRange 可能是直接建構的，這裡再檢查一次
        let price = PriceRange::new(price.min, price.max)?;

        Ok(Self {
            location,
            radius,
            categories,
            price,
            limit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A place record as returned by the upstream service. Fields this crate does
/// not interpret are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Place {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// Popularity used for ranking; absent counts rank as zero.
    pub fn rating_count(&self) -> u64 {
        self.user_ratings_total.unwrap_or(0)
    }

    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref().map(|g| g.location)
    }
}

/// Final ranked, truncated list of places for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    places: Vec<Place>,
}

impl ResultSet {
    /// Sorts descending by rating count (stable) and keeps at most `limit` places.
    pub fn ranked(mut places: Vec<Place>, limit: usize) -> Self {
        places.sort_by(|a, b| b.rating_count().cmp(&a.rating_count()));
        places.truncate(limit);
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    Other(String),
}

impl From<String> for PlacesStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OK" => PlacesStatus::Ok,
            "ZERO_RESULTS" => PlacesStatus::ZeroResults,
            _ => PlacesStatus::Other(s),
        }
    }
}

impl From<PlacesStatus> for String {
    fn from(status: PlacesStatus) -> Self {
        match status {
            PlacesStatus::Ok => "OK".to_string(),
            PlacesStatus::ZeroResults => "ZERO_RESULTS".to_string(),
            PlacesStatus::Other(s) => s,
        }
    }
}

/// One page of an upstream nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub status: PlacesStatus,
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SearchPage {
    pub fn check_status(&self) -> Result<()> {
        match &self.status {
            PlacesStatus::Ok | PlacesStatus::ZeroResults => Ok(()),
            PlacesStatus::Other(status) => Err(PlacesError::UpstreamStatus {
                status: status.clone(),
                message: self.error_message.clone().unwrap_or_default(),
            }),
        }
    }
}

/// A single upstream call. Continuation requests carry only the token and key.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    First {
        location: LatLng,
        radius: u32,
        category: Category,
        price: Option<PriceRange>,
        api_key: String,
    },
    Next {
        page_token: String,
        api_key: String,
    },
}

impl PageRequest {
    pub fn first(query: &Query, category: &Category, api_key: &str) -> Self {
        PageRequest::First {
            location: query.location,
            radius: query.radius,
            category: category.clone(),
            price: category.accepts_price().then_some(query.price),
            api_key: api_key.to_string(),
        }
    }

    pub fn next(page_token: impl Into<String>, api_key: &str) -> Self {
        PageRequest::Next {
            page_token: page_token.into(),
            api_key: api_key.to_string(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            PageRequest::First {
                location,
                radius,
                category,
                price,
                api_key,
            } => {
                let mut pairs = vec![
                    ("location", location.to_param()),
                    ("radius", radius.to_string()),
                    ("type", category.to_string()),
                    ("key", api_key.clone()),
                ];
                if let Some(price) = price {
                    pairs.push(("minprice", price.min.to_string()));
                    pairs.push(("maxprice", price.max.to_string()));
                }
                pairs
            }
            PageRequest::Next {
                page_token,
                api_key,
            } => vec![("pagetoken", page_token.clone()), ("key", api_key.clone())],
        }
    }

    /// Loggable summary; never includes the key.
    pub fn describe(&self) -> String {
        self.query_pairs()
            .into_iter()
            .filter(|(k, _)| *k != "key")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}
