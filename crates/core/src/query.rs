use crate::{IndexConfig, SearchParameters};
use serde_json::{json, Map, Value};

pub const MINIMUM_SHOULD_MATCH: &str = "75%";

#[derive(Debug, Clone, PartialEq)]
pub struct BoostedField {
    pub name: &'static str,
    pub boost: f64,
}

pub const TEXT_FIELDS: [BoostedField; 2] = [
    BoostedField { name: "name", boost: 2.0 },
    BoostedField { name: "description", boost: 1.0 },
];

/// Scored best-fields match over the text fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TextClause {
    pub query: String,
    pub fields: Vec<BoostedField>,
    pub analyzer: String,
    pub minimum_should_match: &'static str,
}

/// Unscored gate on document inclusion.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Both ends inclusive.
    PriceRange { gte: Option<f64>, lte: Option<f64> },
    CategoryTerm(String),
    InStock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub text: Option<TextClause>,
    pub filters: Vec<FilterClause>,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct QueryComposer {
    analyzer: String,
    max_results: usize,
}

impl QueryComposer {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            analyzer: config.analyzer.clone(),
            max_results: config.max_results,
        }
    }

    pub fn compose(&self, params: &SearchParameters) -> SearchRequest {
        let text = (!params.query.is_empty()).then(|| TextClause {
            query: params.query.clone(),
            fields: TEXT_FIELDS.to_vec(),
            analyzer: self.analyzer.clone(),
            minimum_should_match: MINIMUM_SHOULD_MATCH,
        });

        let mut filters = Vec::new();

        if params.has_price_bounds() {
            filters.push(FilterClause::PriceRange {
                gte: params.price_min,
                lte: params.price_max,
            });
        }
        if let Some(category) = &params.category {
            filters.push(FilterClause::CategoryTerm(category.clone()));
        }
        if params.available {
            filters.push(FilterClause::InStock);
        }

        SearchRequest {
            text,
            filters,
            size: self.max_results,
        }
    }
}

impl SearchRequest {
    /// Request body for the `_search` endpoint. The text clause sits in
    /// `must` and is the only score contributor; filters go in `filter`.
    pub fn to_body(&self) -> Value {
        let must = match &self.text {
            Some(text) => text.to_query(),
            None => json!({"match_all": {}}),
        };

        json!({
            "size": self.size,
            "track_total_hits": true,
            "query": {
                "bool": {
                    "must": [must],
                    "filter": self.filters.iter().map(FilterClause::to_query).collect::<Vec<_>>()
                }
            }
        })
    }
}

impl TextClause {
    fn to_query(&self) -> Value {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                if field.boost == 1.0 {
                    field.name.to_string()
                } else {
                    format!("{}^{}", field.name, field.boost)
                }
            })
            .collect();

        json!({
            "multi_match": {
                "query": self.query,
                "fields": fields,
                "type": "best_fields",
                "analyzer": self.analyzer,
                "minimum_should_match": self.minimum_should_match
            }
        })
    }
}

impl FilterClause {
    fn to_query(&self) -> Value {
        match self {
            Self::PriceRange { gte, lte } => {
                let mut range = Map::new();
                if let Some(gte) = gte {
                    range.insert("gte".to_string(), json!(gte));
                }
                if let Some(lte) = lte {
                    range.insert("lte".to_string(), json!(lte));
                }
                json!({"range": {"price": range}})
            }
            Self::CategoryTerm(category) => json!({"term": {"category": category}}),
            Self::InStock => json!({"range": {"stock": {"gt": 0}}}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> QueryComposer {
        QueryComposer::new(&IndexConfig::default())
    }

    #[test]
    fn empty_parameters_match_everything() {
        let request = composer().compose(&SearchParameters::default());
        assert!(request.text.is_none());
        assert!(request.filters.is_empty());

        let body = request.to_body();
        assert_eq!(body.pointer("/query/bool/must/0"), Some(&json!({"match_all": {}})));
        assert_eq!(body.pointer("/query/bool/filter"), Some(&json!([])));
        assert_eq!(body["size"], json!(100));
    }

    #[test]
    fn text_query_boosts_name_over_description() {
        let params = SearchParameters {
            query: "gaming".to_string(),
            ..Default::default()
        };
        let body = composer().compose(&params).to_body();
        let multi_match = body.pointer("/query/bool/must/0/multi_match").unwrap();

        assert_eq!(multi_match["query"], "gaming");
        assert_eq!(multi_match["fields"], json!(["name^2", "description"]));
        assert_eq!(multi_match["type"], "best_fields");
        assert_eq!(multi_match["analyzer"], "spanish");
        assert_eq!(multi_match["minimum_should_match"], "75%");
    }

    #[test]
    fn single_price_bound_only_emits_that_bound() {
        let params = SearchParameters {
            price_max: Some(500.0),
            ..Default::default()
        };
        let body = composer().compose(&params).to_body();
        assert_eq!(
            body.pointer("/query/bool/filter/0"),
            Some(&json!({"range": {"price": {"lte": 500.0}}}))
        );
    }

    #[test]
    fn all_filters_are_combined_outside_scoring() {
        let params = SearchParameters {
            query: "gaming".to_string(),
            price_min: Some(-100.0),
            price_max: Some(2000.0),
            category: Some("electronics".to_string()),
            available: true,
        };
        let request = composer().compose(&params);
        assert_eq!(
            request.filters,
            vec![
                FilterClause::PriceRange {
                    gte: Some(-100.0),
                    lte: Some(2000.0)
                },
                FilterClause::CategoryTerm("electronics".to_string()),
                FilterClause::InStock,
            ]
        );

        let body = request.to_body();
        let must = body.pointer("/query/bool/must").and_then(Value::as_array).unwrap();
        assert_eq!(must.len(), 1);
        assert_eq!(
            body.pointer("/query/bool/filter/0/range/price/gte"),
            Some(&json!(-100.0))
        );
        assert_eq!(
            body.pointer("/query/bool/filter/2"),
            Some(&json!({"range": {"stock": {"gt": 0}}}))
        );
    }

    #[test]
    fn max_results_sets_size() {
        let config = IndexConfig {
            max_results: 5,
            ..Default::default()
        };
        let request = QueryComposer::new(&config).compose(&SearchParameters::default());
        assert_eq!(request.size, 5);
    }
}
