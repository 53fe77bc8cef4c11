//! Category selector: "show all" or a single group.

use crate::group::ProductGroup;
use crate::product::Product;

/// Query parameter that carries the initial selector in a deep link.
pub const CATEGORY_PARAM: &str = "category";

/// The category filter currently applied to the shop view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategorySelector {
    /// No filter.
    #[default]
    All,
    /// Only products whose group equals this tag.
    Group(ProductGroup),
}

impl CategorySelector {
    pub fn group(tag: impl Into<ProductGroup>) -> Self {
        CategorySelector::Group(tag.into())
    }

    /// Parse the `category` deep-link value.
    ///
    /// Accepts either the bare value (`Laptop`) or a query string
    /// (`?category=Laptop&ref=home`). Missing, empty, `All` and unknown values
    /// all mean "no filter".
    pub fn from_query(raw: &str) -> Self {
        let raw = raw.trim();
        let value = if raw.starts_with('?') || raw.contains('=') {
            match query_value(raw, CATEGORY_PARAM) {
                Some(value) => value,
                None => return CategorySelector::All,
            }
        } else {
            raw.to_string()
        };

        match ProductGroup::parse_known(&value) {
            Some(group) => CategorySelector::Group(group),
            None => CategorySelector::All,
        }
    }

    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Group(group) => product.group() == group,
        }
    }

    /// Label for the filter button that represents this selector.
    pub fn label(&self) -> &str {
        match self {
            CategorySelector::All => "All",
            CategorySelector::Group(group) => group.display_label(),
        }
    }
}

fn query_value(query: &str, key: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.replace('+', " ").replace("%20", " "))
}
