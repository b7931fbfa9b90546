use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{AppError, AppResult};

pub const INVALID_PRODUCT: &str = "Invalid product data";

/// Core product entity as stored and as returned over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Number,
    pub category: String,
    #[serde(rename = "inStock")]
    pub in_stock: bool,
}

impl Product {
    pub fn from_new(id: String, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            in_stock: new.in_stock,
        }
    }

    /// Overwrite every field except `id`.
    pub fn replace_with(&mut self, new: NewProduct) {
        self.name = new.name;
        self.description = new.description;
        self.price = new.price;
        self.category = new.category;
        self.in_stock = new.in_stock;
    }
}

/// Validated create/replace input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Number,
    pub category: String,
    pub in_stock: bool,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Raw create/replace body. Fields stay untyped so a wrong JSON type is a
/// validation failure (400) rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default, rename = "inStock")]
    pub in_stock: Option<Value>,
}

fn required_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

impl ProductPayload {
    pub fn validate(&self) -> AppResult<NewProduct> {
        let invalid = || AppError::BadRequest(INVALID_PRODUCT.to_string());

        let name = required_text(self.name.as_ref()).ok_or_else(invalid)?;
        let description = required_text(self.description.as_ref()).ok_or_else(invalid)?;
        let category = required_text(self.category.as_ref()).ok_or_else(invalid)?;
        let price = match &self.price {
            Some(Value::Number(n)) => n.clone(),
            _ => return Err(invalid()),
        };
        let in_stock = self
            .in_stock
            .as_ref()
            .and_then(Value::as_bool)
            .ok_or_else(invalid)?;

        Ok(NewProduct {
            name,
            description,
            price,
            category,
            in_stock,
        })
    }
}

// ── Query parameters ──────────────────────────────────────────────────────────

/// `page` and `limit` stay raw strings; see [`crate::pagination::Pagination::parse`].
#[derive(Debug, Deserialize, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}
