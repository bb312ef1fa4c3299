use crate::{SearchError, SearchParameters};

pub const QUERY: &str = "query";
pub const PRICE_MIN: &str = "price_min";
pub const PRICE_MAX: &str = "price_max";
pub const CATEGORY: &str = "category";
pub const AVAILABLE: &str = "available";

impl SearchParameters {
    /// Validates raw query-string pairs. Unknown keys are ignored and a
    /// repeated key keeps its last value.
    ///
    /// A price bound that does not parse as a finite number rejects the whole
    /// request. `available` is true only for `"true"` in any casing; any other
    /// value, malformed or not, disables the stock filter instead of failing.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = SearchParameters::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                QUERY => params.query = value.to_string(),
                PRICE_MIN => params.price_min = parse_price(PRICE_MIN, value)?,
                PRICE_MAX => params.price_max = parse_price(PRICE_MAX, value)?,
                CATEGORY => {
                    params.category = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_lowercase())
                    }
                }
                AVAILABLE => params.available = value.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }

        Ok(params)
    }

    pub fn has_price_bounds(&self) -> bool {
        self.price_min.is_some() || self.price_max.is_some()
    }
}

/// Empty values count as absent. Negative bounds are accepted as-is.
fn parse_price(parameter: &'static str, raw: &str) -> Result<Option<f64>, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(SearchError::InvalidParameter {
            parameter,
            value: raw.to_string(),
        }),
    }
}
