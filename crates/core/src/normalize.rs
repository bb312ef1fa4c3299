use crate::{SearchError, SearchResponse, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchResponse {
    pub hits: RawHits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHits {
    pub total: RawTotal,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

/// Older clusters report the total as a bare number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    Tracked { value: u64 },
    Count(u64),
}

impl RawTotal {
    pub fn value(&self) -> u64 {
        match self {
            Self::Tracked { value } | Self::Count(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

/// Turns raw index hits into typed results, keeping the index's order.
/// Any hit with missing or unusable fields fails the whole response.
pub fn normalize(raw: RawSearchResponse) -> Result<SearchResponse, SearchError> {
    let results = raw
        .hits
        .hits
        .into_iter()
        .map(normalize_hit)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SearchResponse {
        total: raw.hits.total.value(),
        max_score: raw.hits.max_score,
        results,
    })
}

fn normalize_hit(hit: RawHit) -> Result<SearchResult, SearchError> {
    let malformed = |details: String| SearchError::MalformedHit {
        id: hit.id.clone(),
        details,
    };

    let score = hit
        .score
        .ok_or_else(|| malformed("missing _score".to_string()))?;

    Ok(SearchResult {
        name: text_field(&hit.source, "name").map_err(malformed)?,
        description: text_field(&hit.source, "description").map_err(malformed)?,
        category: text_field(&hit.source, "category").map_err(malformed)?,
        price: price_field(&hit.source).map_err(malformed)?,
        stock: stock_field(&hit.source).map_err(malformed)?,
        score,
        id: hit.id,
    })
}

fn text_field(source: &Map<String, Value>, field: &str) -> Result<String, String> {
    match source.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(format!("{field} is not a string: {other}")),
        None => Err(format!("{field} is missing")),
    }
}

fn price_field(source: &Map<String, Value>) -> Result<f64, String> {
    let raw = source
        .get("price")
        .ok_or_else(|| "price is missing".to_string())?;

    let price = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    price
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("price is not a finite number: {raw}"))
}

/// Accepts integers, integral floats and numeric strings. Fractional
/// stock is rejected rather than truncated.
fn stock_field(source: &Map<String, Value>) -> Result<i64, String> {
    let raw = source
        .get("stock")
        .ok_or_else(|| "stock is missing".to_string())?;

    let as_float = match raw {
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Ok(value);
            }
            number.as_f64()
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(value) = text.parse::<i64>() {
                return Ok(value);
            }
            text.parse::<f64>().ok()
        }
        _ => None,
    };

    match as_float {
        Some(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value <= i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(format!("stock is not an integer: {raw}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(hits: Value) -> RawSearchResponse {
        serde_json::from_value(json!({
            "took": 3,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.8,
                "hits": hits
            }
        }))
        .unwrap()
    }

    fn source(price: Value, stock: Value) -> Value {
        json!({
            "name": "Gaming Laptop",
            "description": "High-end gaming laptop",
            "category": "Electronics",
            "price": price,
            "stock": stock
        })
    }

    #[test]
    fn hits_keep_index_order_and_metadata() {
        let response = normalize(raw(json!([
            {"_id": "1", "_score": 1.8, "_source": source(json!(1500.0), json!(10))},
            {"_id": "3", "_score": 0.6, "_source": source(json!(100), json!(5))}
        ])))
        .unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.max_score, Some(1.8));
        let ids: Vec<_> = response.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(response.results[1].price, 100.0);
        assert_eq!(response.results[0].stock, 10);
    }

    #[test]
    fn loose_numbers_are_coerced() {
        let response = normalize(raw(json!([
            {"_id": "1", "_score": 1.0, "_source": source(json!("299.99"), json!(7.0))},
            {"_id": "2", "_score": 1.0, "_source": source(json!(0.5), json!("3"))}
        ])))
        .unwrap();

        assert_eq!(response.results[0].price, 299.99);
        assert_eq!(response.results[0].stock, 7);
        assert_eq!(response.results[1].price, 0.5);
        assert_eq!(response.results[1].stock, 3);
    }

    #[test]
    fn fractional_stock_is_rejected_not_truncated() {
        let error = normalize(raw(json!([
            {"_id": "9", "_score": 1.0, "_source": source(json!(10), json!(0.4))}
        ])))
        .unwrap_err();

        assert!(matches!(error, SearchError::MalformedHit { ref id, .. } if id == "9"));
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let error = normalize(raw(json!([
            {"_id": "4", "_score": 1.0, "_source": source(json!("cheap"), json!(1))}
        ])))
        .unwrap_err();
        assert!(error.to_string().contains("price"));
    }

    #[test]
    fn missing_field_is_malformed() {
        let error = normalize(raw(json!([
            {"_id": "5", "_score": 1.0, "_source": {"name": "Only a name"}}
        ])))
        .unwrap_err();
        assert!(matches!(error, SearchError::MalformedHit { .. }));
    }

    #[test]
    fn legacy_numeric_total_is_accepted() {
        let raw: RawSearchResponse = serde_json::from_value(json!({
            "hits": {"total": 0, "max_score": null, "hits": []}
        }))
        .unwrap();
        let response = normalize(raw).unwrap();
        assert_eq!(response.total, 0);
        assert_eq!(response.max_score, None);
        assert!(response.results.is_empty());
    }
}
