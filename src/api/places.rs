use crate::api::AppState;
use crate::config::SearchDefaults;
use crate::core::aggregator::Aggregator;
use crate::core::{Category, LatLng, PriceRange, Query, ResultSet};
use crate::utils::error::{PlacesError, Result};
use axum::{
    extract::{rejection::QueryRejection, Query as UrlQuery, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Raw query string of `GET /api/google-places`. Every field stays a string
/// so that coercion, not extraction, decides what a bad value means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub types: Option<String>,
    pub minprice: Option<String>,
    pub maxprice: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: ResultSet,
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}

// lat/lng are not validated: garbage becomes NaN and goes upstream as-is
fn parse_coordinate(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

impl PlacesParams {
    pub fn into_query(self, defaults: &SearchDefaults) -> Result<Query> {
        let location = LatLng::new(
            parse_coordinate(self.lat.as_deref()),
            parse_coordinate(self.lng.as_deref()),
        );

        let radius = parse_int(self.radius.as_deref())
            .map(|r| r.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(defaults.radius);

        let mut categories: Vec<Category> = self
            .types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Category::from)
            .collect();
        if categories.is_empty() {
            categories = defaults.categories();
        }

        let min = parse_int(self.minprice.as_deref()).unwrap_or(defaults.minprice as i64);
        let max = parse_int(self.maxprice.as_deref()).unwrap_or(defaults.maxprice as i64);
        let price = PriceRange::clamped(min, max).unwrap_or_else(|| {
            tracing::debug!(min, max, "Reversed price bounds, using defaults");
            defaults.price()
        });

        let limit = parse_int(self.limit.as_deref())
            .filter(|l| *l > 0)
            .map(|l| l as usize)
            .unwrap_or(defaults.limit);

        Query::new(location, radius, categories, price, limit)
    }
}

pub async fn google_places(
    State(state): State<AppState>,
    params: std::result::Result<UrlQuery<PlacesParams>, QueryRejection>,
) -> std::result::Result<Json<SearchResponse>, PlacesError> {
    let Some(api_key) = state.api_key.clone() else {
        return Err(PlacesError::MissingApiKey);
    };

    // 重複的參數等無法解析的查詢字串一律回 500
    let UrlQuery(params) = params.map_err(|e| PlacesError::ValidationError {
        message: e.body_text(),
    })?;

    let query = params.into_query(&state.defaults)?;
    tracing::info!(
        lat = query.location.lat,
        lng = query.location.lng,
        radius = query.radius,
        categories = ?query.categories,
        limit = query.limit,
        "📍 Nearby search requested"
    );

    let aggregator = Aggregator::new(state.source.clone(), Some(api_key));
    let results = aggregator.search(&query).await?;

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> PlacesParams {
        let mut p = PlacesParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "lat" => p.lat = v,
                "lng" => p.lng = v,
                "radius" => p.radius = v,
                "types" => p.types = v,
                "minprice" => p.minprice = v,
                "maxprice" => p.maxprice = v,
                "limit" => p.limit = v,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    #[test]
    fn test_defaults_applied() {
        let query = params(&[("lat", "41.8781"), ("lng", "-87.6298")])
            .into_query(&SearchDefaults::default())
            .unwrap();

        assert_eq!(query.location, LatLng::new(41.8781, -87.6298));
        assert_eq!(query.radius, 1000);
        assert_eq!(query.categories, vec![Category::from("restaurant")]);
        assert_eq!(query.price, PriceRange::default());
        assert_eq!(query.limit, 30);
    }

    #[test]
    fn test_explicit_values_parsed() {
        let query = params(&[
            ("lat", "40.7"),
            ("lng", "-74.0"),
            ("radius", "2500"),
            ("types", "restaurant, lodging,,church"),
            ("minprice", "1"),
            ("maxprice", "3"),
            ("limit", "12"),
        ])
        .into_query(&SearchDefaults::default())
        .unwrap();

        assert_eq!(query.radius, 2500);
        assert_eq!(
            query.categories,
            vec![
                Category::from("restaurant"),
                Category::from("lodging"),
                Category::from("church")
            ]
        );
        assert_eq!(query.price, PriceRange::new(1, 3).unwrap());
        assert_eq!(query.limit, 12);
    }

    #[test]
    fn test_malformed_values_are_coerced() {
        let query = params(&[
            ("lat", "north"),
            ("radius", "-50"),
            ("types", " , "),
            ("minprice", "9"),
            ("maxprice", "-1"),
            ("limit", "0"),
        ])
        .into_query(&SearchDefaults::default())
        .unwrap();

        assert!(query.location.lat.is_nan());
        assert!(query.location.lng.is_nan());
        assert_eq!(query.radius, 0);
        assert_eq!(query.categories, vec![Category::from("restaurant")]);
        assert_eq!(query.price, PriceRange::new(0, 4).unwrap());
        assert_eq!(query.limit, 30);
    }

    #[test]
    fn test_reversed_price_bounds_fall_back_to_defaults() {
        let query = params(&[("lat", "1"), ("lng", "2"), ("minprice", "3"), ("maxprice", "1")])
            .into_query(&SearchDefaults::default())
            .unwrap();
        assert_eq!(query.price, PriceRange::default());

        let defaults = SearchDefaults {
            minprice: 1,
            maxprice: 2,
            ..SearchDefaults::default()
        };
        let query = params(&[("minprice", "4"), ("maxprice", "0")])
            .into_query(&defaults)
            .unwrap();
        assert_eq!(query.price, PriceRange::new(1, 2).unwrap());
    }

    #[test]
    fn test_configured_defaults_used() {
        let defaults = SearchDefaults {
            radius: 750,
            types: vec!["cafe".to_string()],
            minprice: 1,
            maxprice: 2,
            limit: 5,
        };
        let query = params(&[("lat", "1"), ("lng", "2")])
            .into_query(&defaults)
            .unwrap();

        assert_eq!(query.radius, 750);
        assert_eq!(query.categories, vec![Category::from("cafe")]);
        assert_eq!(query.price, PriceRange::new(1, 2).unwrap());
        assert_eq!(query.limit, 5);
    }
}
