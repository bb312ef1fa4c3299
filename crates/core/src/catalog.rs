use crate::{CatalogError, Product};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProductRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    name: String,
    #[serde(default)]
    description: String,
    category: String,
    price: f64,
    #[serde(default)]
    stock: i64,
}

/// Reads a JSON array of catalog products. Records without an `id` get
/// their 1-based position in the file.
pub fn load_products(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let contents = fs::read_to_string(path)?;
    parse_products(&contents)
}

pub fn parse_products(contents: &str) -> Result<Vec<Product>, CatalogError> {
    let records: Vec<ProductRecord> = serde_json::from_str(contents)?;
    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(records.len());

    for (position, record) in records.into_iter().enumerate() {
        let id = match record.id {
            None | Some(serde_json::Value::Null) => (position + 1).to_string(),
            Some(serde_json::Value::String(id)) => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            Some(other) => {
                return Err(CatalogError::InvalidProduct(format!(
                    "record {} has unsupported id {other}",
                    position + 1
                )))
            }
        };

        if record.name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct(format!(
                "product {id} has an empty name"
            )));
        }
        if !seen.insert(id.clone()) {
            return Err(CatalogError::InvalidProduct(format!(
                "duplicate product id {id}"
            )));
        }

        products.push(Product {
            id,
            name: record.name,
            description: record.description,
            category: record.category,
            price: record.price,
            stock: record.stock,
        });
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::{load_products, parse_products};
    use crate::CatalogError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn products_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[
                {"name": "Gaming Laptop", "description": "High-end gaming laptop",
                 "category": "Electronics", "price": 1500.00, "stock": 10},
                {"id": "sku-2", "name": "LED Monitor", "category": "Electronics", "price": 300}
            ]"#,
        )?;

        let products = load_products(&path)?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "1");
        assert_eq!(products[1].id, "sku-2");
        assert_eq!(products[1].stock, 0);
        assert_eq!(products[1].description, "");
        Ok(())
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let products =
            parse_products(r#"[{"id": 42, "name": "Keyboard", "category": "Peripherals", "price": 100}]"#)
                .unwrap();
        assert_eq!(products[0].id, "42");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = parse_products(
            r#"[
                {"id": "a", "name": "One", "category": "x", "price": 1},
                {"id": "a", "name": "Two", "category": "x", "price": 2}
            ]"#,
        );
        assert!(matches!(result, Err(CatalogError::InvalidProduct(_))));
    }

    #[test]
    fn missing_file_is_io_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let result = load_products(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
        Ok(())
    }
}
