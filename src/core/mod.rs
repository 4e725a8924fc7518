pub mod aggregator;

pub use crate::domain::model::{Category, LatLng, Place, PriceRange, Query, ResultSet};
pub use crate::domain::ports::{ConfigProvider, PlacesSource};
pub use crate::utils::error::Result;
