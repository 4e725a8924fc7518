use crate::core::{PlacesSource, Result};
use crate::domain::model::{Category, PageRequest, Place, Query, ResultSet, LODGING};
use crate::utils::error::PlacesError;
use std::time::Duration;

/// Wait required by the upstream before a freshly issued page token is accepted.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_millis(2000);

pub const MAX_PAGES_PER_CATEGORY: usize = 3;

/// Pagination stops once this many places are collected across all categories.
pub const MAX_ACCUMULATED_RESULTS: usize = 60;

/// Runs one paginated search per category and ranks the merged places.
///
/// Categories and pages are fetched strictly in sequence. A page token is
/// only valid for the chain that issued it, and only after [`PAGE_TOKEN_DELAY`].
pub struct Aggregator<S: PlacesSource> {
    source: S,
    api_key: Option<String>,
}

impl<S: PlacesSource> Aggregator<S> {
    pub fn new(source: S, api_key: Option<String>) -> Self {
        Self { source, api_key }
    }

    pub async fn search(&self, query: &Query) -> Result<ResultSet> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(PlacesError::MissingApiKey)?;

        let mut accumulated: Vec<Place> = Vec::new();
        for category in &query.categories {
            self.collect_category(query, category, api_key, &mut accumulated)
                .await?;
        }

        let collected = accumulated.len();
        let results = ResultSet::ranked(accumulated, query.limit);
        tracing::info!(
            collected,
            returned = results.len(),
            limit = query.limit,
            "Nearby search finished"
        );

        Ok(results)
    }

    async fn collect_category(
        &self,
        query: &Query,
        category: &Category,
        api_key: &str,
        accumulated: &mut Vec<Place>,
    ) -> Result<()> {
        let mut request = PageRequest::first(query, category, api_key);
        let mut pages = 0;

        while accumulated.len() < MAX_ACCUMULATED_RESULTS && pages < MAX_PAGES_PER_CATEGORY {
            tracing::debug!(
                category = %category,
                page = pages + 1,
                request = %request.describe(),
                "Fetching places page"
            );
            let page = self.source.nearby_search(&request).await?;
            pages += 1;

            if let Err(e) = page.check_status() {
                tracing::warn!(category = %category, page = pages, "⚠️ Skipping rest of category: {}", e);
                break;
            }

            let before = accumulated.len();
            accumulated.extend(
                page.results
                    .into_iter()
                    .filter(|place| category.is_lodging() || !place.has_tag(LODGING)),
            );
            tracing::debug!(
                category = %category,
                page = pages,
                kept = accumulated.len() - before,
                total = accumulated.len(),
                "Page collected"
            );

            let Some(token) = page.next_page_token else {
                break;
            };
            if pages >= MAX_PAGES_PER_CATEGORY || accumulated.len() >= MAX_ACCUMULATED_RESULTS {
                break;
            }

            // token 發出後必須等待，否則上游回傳 INVALID_REQUEST
            tokio::time::sleep(PAGE_TOKEN_DELAY).await;
            request = PageRequest::next(token, api_key);
        }

        Ok(())
    }
}
