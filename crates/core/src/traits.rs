use crate::{Product, RawSearchResponse, SearchError, SearchRequest};
use async_trait::async_trait;

#[async_trait]
pub trait ProductIndex: Send + Sync {
    async fn index_products(&self, products: &[Product]) -> Result<(), SearchError>;

    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError>;
}
