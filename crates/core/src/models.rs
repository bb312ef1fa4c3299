use serde::{Deserialize, Serialize};

/// A catalog record as handed to the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}

/// Validated search input. Built by [`SearchParameters::from_pairs`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParameters {
    pub query: String,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Already lower-cased.
    pub category: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub total: u64,
    pub max_score: Option<f64>,
    pub results: Vec<SearchResult>,
}
