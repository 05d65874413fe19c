//! Catalog models: products, suppliers, and customers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A selectable catalog record.
///
/// The lookup functions in `services::catalog` operate through this trait so
/// the same filter/typeahead behavior serves products, suppliers, and
/// customers alike.
pub trait CatalogEntry {
    fn entry_id(&self) -> i64;

    /// The plain label list views substring-filter on.
    fn label(&self) -> &str;

    /// The composite string typeahead inputs display and resolve against.
    fn display_label(&self) -> String {
        self.label().to_string()
    }
}

/// Product available for document lines.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub unit_price: Decimal,
}

impl CatalogEntry for Product {
    fn entry_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    // Product typeahead shows "<name> - <code>" so same-named products with
    // different codes stay distinguishable.
    fn display_label(&self) -> String {
        format!("{} - {}", self.name, self.code)
    }
}

/// Supplier party for purchases and goods receipts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub tax_id: String,
}

impl CatalogEntry for Supplier {
    fn entry_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Customer party for sales orders and returns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub tax_id: Option<String>,
}

impl CatalogEntry for Customer {
    fn entry_id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
