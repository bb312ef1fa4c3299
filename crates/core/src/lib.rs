pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod params;
pub mod query;
pub mod service;
pub mod stores;
pub mod traits;

pub use catalog::{load_products, parse_products};
pub use config::IndexConfig;
pub use error::{CatalogError, ErrorKind, SearchError};
pub use models::{Product, SearchParameters, SearchResponse, SearchResult};
pub use normalize::{normalize, RawHit, RawHits, RawSearchResponse, RawTotal};
pub use query::{BoostedField, FilterClause, QueryComposer, SearchRequest, TextClause};
pub use service::SearchService;
pub use stores::{MemoryStore, OpenSearchStore};
pub use traits::ProductIndex;
