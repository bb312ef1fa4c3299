use crate::models::Product;
use crate::traits::ProductIndex;
use crate::{IndexConfig, RawSearchResponse, SearchError, SearchRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

const BACKEND: &str = "opensearch";

/// Client for an Elasticsearch/OpenSearch product index.
pub struct OpenSearchStore {
    client: Client,
    base: Url,
    index_name: String,
    analyzer: String,
}

impl OpenSearchStore {
    pub fn new(config: &IndexConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        let mut base = Url::parse(&config.endpoint)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client,
            base,
            index_name: config.index_name.clone(),
            analyzer: config.analyzer.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn url(&self, path: &str) -> Result<Url, SearchError> {
        Ok(self.base.join(path)?)
    }

    /// Creates the index with the product mapping unless it already exists.
    pub async fn ensure_index(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .head(self.url(&self.index_name)?)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            return Ok(());
        }

        if response.status() != StatusCode::NOT_FOUND {
            return Err(backend_error(response.status()));
        }

        let response = self
            .client
            .put(self.url(&self.index_name)?)
            .json(&index_definition(&self.analyzer))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Request(format!(
                "index setup failed with {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn refresh(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .post(self.url(&format!("{}/_refresh", self.index_name))?)
            .send()
            .await?;

        check_status(response.status())
    }
}

#[async_trait]
impl ProductIndex for OpenSearchStore {
    async fn index_products(&self, products: &[Product]) -> Result<(), SearchError> {
        if products.is_empty() {
            return Ok(());
        }

        let mut payload = String::new();
        for product in products {
            let action = json!({
                "index": {
                    "_index": self.index_name,
                    "_id": product.id,
                }
            });
            let document = json!({
                "name": product.name,
                "description": product.description,
                "category": product.category,
                "price": product.price,
                "stock": product.stock,
            });
            payload.push_str(&serde_json::to_string(&action)?);
            payload.push('\n');
            payload.push_str(&serde_json::to_string(&document)?);
            payload.push('\n');
        }

        let response = self
            .client
            .post(self.url("_bulk")?)
            .header("Content-Type", "application/x-ndjson")
            .body(payload)
            .send()
            .await?;

        check_status(response.status())?;

        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        if body.get("errors").and_then(Value::as_bool).unwrap_or(false) {
            return Err(SearchError::BackendResponse {
                backend: BACKEND.to_string(),
                details: "bulk indexing reported item errors".to_string(),
            });
        }

        self.refresh().await
    }

    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError> {
        let body = request.to_body();
        debug!(index = %self.index_name, body = %body, "executing search");

        let response = self
            .client
            .post(self.url(&format!("{}/_search", self.index_name))?)
            .json(&body)
            .send()
            .await?;

        check_status(response.status())?;

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn check_status(status: StatusCode) -> Result<(), SearchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(backend_error(status))
    }
}

/// A cluster answering 503 cannot serve queries, same as one that is unreachable.
fn backend_error(status: StatusCode) -> SearchError {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        SearchError::Unavailable(format!("{BACKEND} responded {status}"))
    } else {
        SearchError::BackendResponse {
            backend: BACKEND.to_string(),
            details: status.to_string(),
        }
    }
}

fn index_definition(analyzer: &str) -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0,
            "analysis": {
                "normalizer": {
                    "lowercase_keyword": {
                        "type": "custom",
                        "filter": ["lowercase"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                "name": {
                    "type": "text",
                    "analyzer": analyzer,
                    "fields": {
                        "raw": {"type": "keyword"}
                    }
                },
                "description": {"type": "text", "analyzer": analyzer},
                "category": {"type": "keyword", "normalizer": "lowercase_keyword"},
                "price": {"type": "float"},
                "stock": {"type": "integer"}
            }
        }
    })
}
