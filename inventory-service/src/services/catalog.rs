//! Catalog lookup and line pricing.
//!
//! Pure functions over catalog snapshots. Lookups never fail: a miss is an
//! empty list or `None` ("selection cleared"), and pricing treats a line
//! whose product is not in the snapshot as contributing zero.

use crate::models::{CatalogEntry, LineItem, Product};
use rust_decimal::Decimal;

/// Case-insensitive substring filter on entry labels. An empty (or
/// whitespace-only) query returns the full list; input order is preserved.
pub fn filter_by_label<'a, T: CatalogEntry>(entries: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|e| e.label().to_lowercase().contains(&query))
        .collect()
}

/// Resolve a typeahead's display text to a single entry by exact
/// case-insensitive equality on the composite display label.
///
/// `None` means no selection, not a fault; callers treat it as "selection
/// cleared".
pub fn resolve_exact<'a, T: CatalogEntry>(entries: &'a [T], text: &str) -> Option<&'a T> {
    let text = text.trim();
    entries
        .iter()
        .find(|e| e.display_label().eq_ignore_ascii_case(text))
}

/// Total of a line collection against a product snapshot: the sum of
/// `quantity x unit_price` over every line whose product resolves.
///
/// A line referencing a product missing from the snapshot (catalog still
/// loading, product since removed) contributes zero. Order-independent.
pub fn compute_total(lines: &[LineItem], products: &[Product]) -> Decimal {
    lines
        .iter()
        .map(|line| {
            products
                .iter()
                .find(|p| p.id == line.product_id)
                .map(|p| p.unit_price * Decimal::from(line.quantity))
                .unwrap_or(Decimal::ZERO)
        })
        .sum()
}
