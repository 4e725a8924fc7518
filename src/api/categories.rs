use crate::core::Category;
use axum::Json;
use serde::Serialize;

/// Filter options offered by the map client, with their list glyphs.
pub const CATEGORY_OPTIONS: [(&str, &str); 6] = [
    ("restaurant", "🥘"),
    ("supermarket", "🛒"),
    ("transit_station", "🚌"),
    ("lodging", "🛏️"),
    ("book_store", "📚"),
    ("church", "⛪"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub id: &'static str,
    pub label: &'static str,
    pub price_filter: bool,
}

pub fn catalogue() -> Vec<CategoryOption> {
    CATEGORY_OPTIONS
        .iter()
        .map(|&(id, label)| CategoryOption {
            id,
            label,
            price_filter: Category::from(id).accepts_price(),
        })
        .collect()
}

/// Glyph for a category, if the client has one.
pub fn label_for(category: &str) -> Option<&'static str> {
    CATEGORY_OPTIONS
        .iter()
        .find(|(id, _)| *id == category)
        .map(|(_, label)| *label)
}

pub async fn list_categories() -> Json<Vec<CategoryOption>> {
    Json(catalogue())
}
