//! # Catalog
//!
//! The in-memory product list mirrored from the backend, and the rules for
//! reconciling it after a remote write.
//!
//! ## Reconciliation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog List Operations                              │
//! │                                                                         │
//! │  Remote call               Local change             Guarantee           │
//! │  ───────────               ────────────             ─────────           │
//! │                                                                         │
//! │  GET  /productos ────────► replace_all(list) ─────► no accumulation    │
//! │                                                                         │
//! │  POST /productos ────────► append(product) ───────► len + 1            │
//! │                                                                         │
//! │  PUT  /productos/:id ────► replace(id, product) ──► same len & index   │
//! │                                                                         │
//! │  GET  /productos/:id ────► (nothing)                read-through       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Product;

/// Products sharing one category, for grouped listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category_id: String,
    pub category_name: String,
    pub products: Vec<Product>,
}

/// The product list owned by the catalog container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    products: Vec<Product>,

    /// When the list was last replaced from the backend.
    refreshed_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replaces the whole list with a fresh backend page.
    pub fn replace_all(&mut self, products: Vec<Product>, at: DateTime<Utc>) {
        self.products = products;
        self.refreshed_at = Some(at);
    }

    /// Appends a newly created product.
    pub fn append(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replaces the entry whose id is `id`, keeping its position.
    ///
    /// Returns false (and leaves the list alone) when the id is unknown.
    pub fn replace(&mut self, id: &str, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// Groups products by category, ordered by category name.
    ///
    /// Product order inside a group follows list order.
    pub fn grouped_by_category(&self) -> Vec<CategoryGroup> {
        let mut groups: BTreeMap<(String, String), Vec<Product>> = BTreeMap::new();

        for product in &self.products {
            groups
                .entry((product.category.name.clone(), product.category.id.clone()))
                .or_default()
                .push(product.clone());
        }

        groups
            .into_iter()
            .map(|((category_name, category_id), products)| CategoryGroup {
                category_id,
                category_name,
                products,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn product(id: &str, name: &str, category: (&str, &str)) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: Category {
                id: category.0.to_string(),
                name: category.1.to_string(),
                created_by: None,
            },
            image: None,
            price: None,
            available: None,
            description: None,
            created_by: None,
        }
    }

    fn coffee(id: &str, name: &str) -> Product {
        product(id, name, ("c1", "Coffee"))
    }

    #[test]
    fn test_replace_all_does_not_accumulate() {
        let mut catalog = Catalog::new();
        let page = vec![coffee("p1", "Latte"), coffee("p2", "Mocha")];

        catalog.replace_all(page.clone(), Utc::now());
        catalog.replace_all(page, Utc::now());

        assert_eq!(catalog.len(), 2);
        assert!(catalog.refreshed_at().is_some());
    }

    #[test]
    fn test_append_adds_exactly_one() {
        let mut catalog = Catalog::new();
        catalog.replace_all(vec![coffee("p1", "Latte")], Utc::now());

        catalog.append(coffee("p9", "Cortado"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products().iter().filter(|p| p.id == "p9").count(), 1);
    }

    #[test]
    fn test_replace_keeps_position_and_length() {
        let mut catalog = Catalog::new();
        catalog.replace_all(
            vec![coffee("p1", "Latte"), coffee("p2", "Mocha"), coffee("p3", "Flat White")],
            Utc::now(),
        );

        assert!(catalog.replace("p2", coffee("p2", "Iced Mocha")));

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.products()[1].id, "p2");
        assert_eq!(catalog.products()[1].name, "Iced Mocha");
    }

    #[test]
    fn test_replace_unknown_id_is_noop() {
        let mut catalog = Catalog::new();
        catalog.replace_all(vec![coffee("p1", "Latte")], Utc::now());
        let before = catalog.clone();

        assert!(!catalog.replace("missing", coffee("missing", "Ghost")));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_grouped_by_category() {
        let mut catalog = Catalog::new();
        catalog.replace_all(
            vec![
                coffee("p1", "Latte"),
                product("p2", "Croissant", ("c2", "Bakery")),
                coffee("p3", "Mocha"),
            ],
            Utc::now(),
        );

        let groups = catalog.grouped_by_category();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category_name, "Bakery");
        assert_eq!(groups[1].category_name, "Coffee");
        let names: Vec<_> = groups[1].products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Latte", "Mocha"]);
    }
}
