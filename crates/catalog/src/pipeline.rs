//! Derived catalog views: the filtered shop listing and landing-page picks.

use crate::group::{KNOWN_GROUPS, ProductGroup};
use crate::product::Product;
use crate::selector::CategorySelector;

/// Derive the shop listing for `selector`.
///
/// Keeps the products matching the selector, then moves every unavailable
/// product after every available one. Relative order inside each half is the
/// source order, so the result is a fixed point: deriving it again with the
/// same selector returns it unchanged.
pub fn derive(catalog: &[Product], selector: &CategorySelector) -> Vec<Product> {
    let (mut available, unavailable): (Vec<Product>, Vec<Product>) = catalog
        .iter()
        .filter(|product| selector.matches(product))
        .cloned()
        .partition(Product::is_available);

    available.extend(unavailable);
    available
}

/// One featured product per landing-page category.
///
/// Categories are visited in `KNOWN_GROUPS` order and contribute the first
/// available product of that group; categories with nothing in stock are skipped.
pub fn featured(catalog: &[Product]) -> Vec<Product> {
    KNOWN_GROUPS
        .iter()
        .filter_map(|tag| {
            catalog
                .iter()
                .find(|p| p.group() == tag && p.is_available())
                .cloned()
        })
        .collect()
}

/// A filter button in the shop view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub selector: CategorySelector,
    pub label: String,
}

impl CategoryOption {
    pub fn is_selected(&self, current: &CategorySelector) -> bool {
        &self.selector == current
    }
}

/// Filter buttons for the shop view: "All" followed by `groups` in order.
pub fn category_options(groups: &[ProductGroup]) -> Vec<CategoryOption> {
    std::iter::once(CategorySelector::All)
        .chain(groups.iter().cloned().map(CategorySelector::Group))
        .map(|selector| CategoryOption {
            label: selector.label().to_string(),
            selector,
        })
        .collect()
}
