use crate::normalize::normalize;
use crate::traits::ProductIndex;
use crate::{
    ErrorKind, IndexConfig, QueryComposer, SearchError, SearchParameters, SearchResponse,
};
use tracing::{debug, error, info, warn};

/// Stateless per request: validate, compose, execute, normalize.
pub struct SearchService<I>
where
    I: ProductIndex,
{
    index: I,
    composer: QueryComposer,
}

impl<I> SearchService<I>
where
    I: ProductIndex,
{
    pub fn new(index: I, config: &IndexConfig) -> Self {
        Self {
            index,
            composer: QueryComposer::new(config),
        }
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Entry point for raw query-string pairs. Validation failures return
    /// before the index is contacted.
    pub async fn search_pairs<P, K, V>(&self, pairs: P) -> Result<SearchResponse, SearchError>
    where
        P: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = SearchParameters::from_pairs(pairs).inspect_err(|error| {
            warn!(%error, "rejected search parameters");
        })?;
        self.search(&params).await
    }

    pub async fn search(&self, params: &SearchParameters) -> Result<SearchResponse, SearchError> {
        debug!(
            query = %params.query,
            price_min = ?params.price_min,
            price_max = ?params.price_max,
            category = ?params.category,
            available = params.available,
            "composing search"
        );

        let request = self.composer.compose(params);
        let outcome = match self.index.search(&request).await {
            Ok(raw) => normalize(raw),
            Err(error) => Err(error),
        };

        match &outcome {
            Ok(response) => info!(
                total = response.total,
                returned = response.results.len(),
                "search completed"
            ),
            Err(failure) => match failure.kind() {
                ErrorKind::ClientInput => warn!(error = %failure, "search rejected"),
                ErrorKind::IndexUnavailable => warn!(error = %failure, "search index unavailable"),
                ErrorKind::Unexpected => error!(error = %failure, "search failed"),
            },
        }

        outcome
    }
}
