use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";
pub const DEFAULT_INDEX_NAME: &str = "products";
pub const DEFAULT_ANALYZER: &str = "spanish";
pub const DEFAULT_MAX_RESULTS: usize = 100;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection and query settings for the product index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub endpoint: String,
    pub index_name: String,
    /// Language analyzer applied to `name` and `description`, both at index
    /// and at query time.
    pub analyzer: String,
    pub connect_timeout: Duration,
    /// Upper bound on the whole index round-trip. No retries are attempted.
    pub request_timeout: Duration,
    pub max_results: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            analyzer: DEFAULT_ANALYZER.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
