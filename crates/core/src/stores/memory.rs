use crate::models::Product;
use crate::query::{FilterClause, TextClause};
use crate::traits::ProductIndex;
use crate::{RawHit, RawHits, RawSearchResponse, RawTotal, SearchError, SearchRequest};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::RwLock;

/// Evaluates composed requests against an in-process product list.
///
/// Text matching approximates a best-fields multi-match: terms are
/// lower-cased word tokens with no language analysis, a field matches when
/// it contains at least the minimum-should-match share of query terms, and
/// a document scores its best field's `matched_terms * boost`. Category
/// terms compare lower-cased, like the keyword normalizer on the real index.
#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|products| products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductIndex for MemoryStore {
    async fn index_products(&self, products: &[Product]) -> Result<(), SearchError> {
        let mut stored = self
            .products
            .write()
            .map_err(|_| SearchError::Request("memory index lock poisoned".to_string()))?;

        for product in products {
            match stored.iter_mut().find(|existing| existing.id == product.id) {
                Some(existing) => *existing = product.clone(),
                None => stored.push(product.clone()),
            }
        }
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError> {
        let stored = self
            .products
            .read()
            .map_err(|_| SearchError::Request("memory index lock poisoned".to_string()))?;

        let mut matches: Vec<(f64, &Product)> = stored
            .iter()
            .filter(|product| request.filters.iter().all(|filter| passes(filter, product)))
            .filter_map(|product| match &request.text {
                Some(text) => text_score(text, product).map(|score| (score, product)),
                None => Some((1.0, product)),
            })
            .collect();

        // stable sort keeps insertion order between equal scores
        matches.sort_by(|left, right| right.0.total_cmp(&left.0));

        let total = matches.len() as u64;
        let max_score = matches.first().map(|(score, _)| *score);
        let hits = matches
            .into_iter()
            .take(request.size)
            .map(|(score, product)| to_hit(score, product))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawSearchResponse {
            hits: RawHits {
                total: RawTotal::Tracked { value: total },
                max_score,
                hits,
            },
        })
    }
}

fn passes(filter: &FilterClause, product: &Product) -> bool {
    match filter {
        FilterClause::PriceRange { gte, lte } => {
            gte.map_or(true, |bound| product.price >= bound)
                && lte.map_or(true, |bound| product.price <= bound)
        }
        FilterClause::CategoryTerm(category) => product.category.to_lowercase() == *category,
        FilterClause::InStock => product.stock > 0,
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn text_score(clause: &TextClause, product: &Product) -> Option<f64> {
    let terms = tokenize(&clause.query);
    if terms.is_empty() {
        return None;
    }

    let required = required_terms(terms.len(), clause.minimum_should_match);

    clause
        .fields
        .iter()
        .filter_map(|field| {
            let value = match field.name {
                "name" => &product.name,
                "description" => &product.description,
                _ => return None,
            };
            let tokens = tokenize(value);
            let matched = terms.iter().filter(|term| tokens.contains(term)).count();
            (matched >= required).then(|| matched as f64 * field.boost)
        })
        .max_by(f64::total_cmp)
}

/// Percentages round down, but at least one term must always match.
fn required_terms(term_count: usize, minimum_should_match: &str) -> usize {
    let percent = minimum_should_match
        .trim_end_matches('%')
        .parse::<usize>()
        .unwrap_or(100);
    (term_count * percent / 100).max(1)
}

fn to_hit(score: f64, product: &Product) -> Result<RawHit, SearchError> {
    let mut source = match serde_json::to_value(product)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    source.remove("id");

    Ok(RawHit {
        id: product.id.clone(),
        score: Some(score),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IndexConfig, QueryComposer, SearchParameters};

    fn product(id: &str, name: &str, description: &str, price: f64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: "Electronics".to_string(),
            price,
            stock,
        }
    }

    #[test]
    fn required_terms_round_down_with_floor_of_one() {
        assert_eq!(required_terms(1, "75%"), 1);
        assert_eq!(required_terms(2, "75%"), 1);
        assert_eq!(required_terms(4, "75%"), 3);
    }

    #[test]
    fn tokenize_splits_on_punctuation() {
        assert_eq!(tokenize("27-inch LED"), vec!["27", "inch", "led"]);
    }

    #[tokio::test]
    async fn indexing_same_id_replaces_product() {
        let store = MemoryStore::default();
        store
            .index_products(&[product("1", "Mouse", "", 10.0, 1)])
            .await
            .unwrap();
        store
            .index_products(&[product("1", "Wireless Mouse", "", 12.0, 1)])
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn size_caps_hits_but_not_total() {
        let store = MemoryStore::new(vec![
            product("1", "A", "", 1.0, 1),
            product("2", "B", "", 2.0, 1),
            product("3", "C", "", 3.0, 1),
        ]);
        let config = IndexConfig {
            max_results: 2,
            ..Default::default()
        };
        let request = QueryComposer::new(&config).compose(&SearchParameters::default());

        let response = store.search(&request).await.unwrap();
        assert_eq!(response.hits.total.value(), 3);
        assert_eq!(response.hits.hits.len(), 2);
        assert!(!response.hits.hits[0].source.contains_key("id"));
    }
}
