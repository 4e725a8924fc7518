use crate::domain::model::{PageRequest, SearchPage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Paginated nearby-search service the aggregator reads from.
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn nearby_search(&self, request: &PageRequest) -> Result<SearchPage>;
}

#[async_trait]
impl<T: PlacesSource + ?Sized> PlacesSource for Arc<T> {
    async fn nearby_search(&self, request: &PageRequest) -> Result<SearchPage> {
        (**self).nearby_search(request).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn bind_address(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}
