use indexmap::IndexMap;
use serde_json::Number;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Product};
use crate::pagination::Pagination;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const QUERY_REQUIRED: &str = "Query required";

fn not_found() -> AppError {
    AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
}

// ── ProductStore ─────────────────────────────────────────────────────────────

/// In-memory product collection.
///
/// Backed by an `IndexMap` keyed by id: lookups are O(1), iteration follows
/// insertion order, and ids are unique by construction. Removal uses
/// `shift_remove` so the remaining records keep their relative order.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: IndexMap<String, Product>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the three fixed startup records.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        for product in seed_products() {
            store.products.insert(product.id.clone(), product);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Category filter (case-insensitive) followed by one page of results.
    /// A blank category means no filter.
    pub fn list(&self, category: Option<&str>, page: Pagination) -> Vec<Product> {
        let category = category
            .filter(|c| !c.trim().is_empty())
            .map(str::to_lowercase);
        let filtered = self.products.values().filter(|p| match &category {
            Some(c) => p.category.to_lowercase() == *c,
            None => true,
        });
        page.apply(filtered.cloned())
    }

    pub fn get(&self, id: &str) -> AppResult<Product> {
        self.products.get(id).cloned().ok_or_else(not_found)
    }

    /// Case-insensitive substring match on the name.
    pub fn search(&self, q: Option<&str>) -> AppResult<Vec<Product>> {
        let q = match q {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return Err(AppError::BadRequest(QUERY_REQUIRED.to_string())),
        };
        Ok(self
            .products
            .values()
            .filter(|p| p.name.to_lowercase().contains(&q))
            .cloned()
            .collect())
    }

    /// Count per category, keyed in order of first appearance.
    pub fn stats(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for p in self.products.values() {
            *counts.entry(p.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn create(&mut self, new: NewProduct) -> Product {
        let id = self.fresh_id();
        let product = Product::from_new(id.clone(), new);
        self.products.insert(id, product.clone());
        product
    }

    /// Overwrite every field but `id`; the record keeps its position.
    pub fn replace(&mut self, id: &str, new: NewProduct) -> AppResult<Product> {
        let product = self.products.get_mut(id).ok_or_else(not_found)?;
        product.replace_with(new);
        Ok(product.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<Product> {
        self.products.shift_remove(id).ok_or_else(not_found)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.products.contains_key(&id) {
                return id;
            }
        }
    }
}

fn seed_products() -> Vec<Product> {
    let product = |id: &str, name: &str, description: &str, price: u64, category: &str, in_stock| Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: Number::from(price),
        category: category.to_string(),
        in_stock,
    };

    vec![
        product("1", "Laptop", "High-performance laptop with 16GB RAM", 1200, "electronics", true),
        product("2", "Smartphone", "Latest model with 128GB storage", 800, "electronics", true),
        product("3", "Coffee Maker", "Programmable coffee maker with timer", 50, "kitchen", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, category: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price: Number::from(10),
            category: category.to_string(),
            in_stock: true,
        }
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    // ── List ───────────────────────────────────────────────────────────────────

    #[test]
    fn list_without_filters_keeps_insertion_order() {
        let store = ProductStore::seeded();
        let all = store.list(None, Pagination::default());
        assert_eq!(names(&all), vec!["Laptop", "Smartphone", "Coffee Maker"]);
    }

    #[test]
    fn list_filters_category_case_insensitively() {
        let store = ProductStore::seeded();
        let hits = store.list(Some("ELECTRONICS"), Pagination::default());
        assert_eq!(names(&hits), vec!["Laptop", "Smartphone"]);
    }

    #[test]
    fn list_unknown_category_is_empty() {
        let store = ProductStore::seeded();
        assert!(store.list(Some("garden"), Pagination::default()).is_empty());
    }

    #[test]
    fn list_paginates_after_filtering() {
        let mut store = ProductStore::seeded();
        store.create(new_product("Tablet", "electronics"));
        let page = Pagination { page: 2, limit: 2 };
        assert_eq!(names(&store.list(Some("electronics"), page)), vec!["Tablet"]);
    }

    #[test]
    fn list_blank_category_is_no_filter() {
        let store = ProductStore::seeded();
        assert_eq!(store.list(Some(""), Pagination::default()).len(), 3);
        assert_eq!(store.list(Some("  "), Pagination::default()).len(), 3);
    }

    #[test]
    fn list_page_past_end_is_empty() {
        let store = ProductStore::seeded();
        assert!(store.list(None, Pagination { page: 5, limit: 10 }).is_empty());
    }

    // ── Get / Search / Stats ───────────────────────────────────────────────────

    #[test]
    fn get_known_and_unknown_ids() {
        let store = ProductStore::seeded();
        assert_eq!(store.get("2").unwrap().name, "Smartphone");
        assert!(matches!(store.get("999"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn search_matches_name_substring() {
        let store = ProductStore::seeded();
        assert_eq!(names(&store.search(Some("lap")).unwrap()), vec!["Laptop"]);
        assert_eq!(names(&store.search(Some("MAKER")).unwrap()), vec!["Coffee Maker"]);
    }

    #[test]
    fn search_keeps_insertion_order_across_matches() {
        let store = ProductStore::seeded();
        assert_eq!(
            names(&store.search(Some("o")).unwrap()),
            vec!["Laptop", "Smartphone", "Coffee Maker"]
        );
    }

    #[test]
    fn search_ignores_description() {
        let store = ProductStore::seeded();
        assert!(store.search(Some("16GB")).unwrap().is_empty());
    }

    #[test]
    fn search_requires_query() {
        let store = ProductStore::seeded();
        assert!(matches!(store.search(None), Err(AppError::BadRequest(_))));
        assert!(matches!(store.search(Some("")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn stats_counts_per_category() {
        let store = ProductStore::seeded();
        let stats = store.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["electronics"], 2);
        assert_eq!(stats["kitchen"], 1);
    }

    #[test]
    fn stats_drop_categories_that_empty_out() {
        let mut store = ProductStore::seeded();
        store.delete("3").unwrap();
        let stats = store.stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats["electronics"], 2);
        assert!(!stats.contains_key("kitchen"));
    }

    #[test]
    fn stats_on_empty_store_is_empty() {
        assert!(ProductStore::new().stats().is_empty());
    }

    // ── Writes ─────────────────────────────────────────────────────────────────

    #[test]
    fn create_assigns_fresh_unique_id() {
        let mut store = ProductStore::seeded();
        let before: Vec<String> = store.list(None, Pagination::default()).into_iter().map(|p| p.id).collect();
        let created = store.create(new_product("Blender", "kitchen"));
        assert!(!created.id.is_empty());
        assert!(!before.contains(&created.id));
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(&created.id).unwrap(), created);
    }

    #[test]
    fn create_appends_at_end() {
        let mut store = ProductStore::seeded();
        store.create(new_product("Blender", "kitchen"));
        let all = store.list(None, Pagination::default());
        assert_eq!(all.last().unwrap().name, "Blender");
    }

    #[test]
    fn replace_overwrites_fields_in_place() {
        let mut store = ProductStore::seeded();
        let updated = store.replace("1", new_product("Gaming Laptop", "computers")).unwrap();
        assert_eq!(updated.id, "1");
        assert_eq!(updated.category, "computers");
        let all = store.list(None, Pagination::default());
        assert_eq!(names(&all)[0], "Gaming Laptop");
    }

    #[test]
    fn replace_unknown_id_is_not_found() {
        let mut store = ProductStore::seeded();
        assert!(matches!(
            store.replace("999", new_product("Ghost", "none")),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn delete_removes_once_and_keeps_order() {
        let mut store = ProductStore::seeded();
        store.delete("2").unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.contains("2"));
        assert_eq!(names(&store.list(None, Pagination::default())), vec!["Laptop", "Coffee Maker"]);
        assert!(matches!(store.delete("2"), Err(AppError::NotFound(_))));
    }
}
