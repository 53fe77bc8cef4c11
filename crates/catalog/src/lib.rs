//! Catalog domain module.
//!
//! Products as published by the catalog source, the session catalog store,
//! the derived shop and landing views, and product image resolution.

pub mod error;
pub mod group;
pub mod images;
pub mod money;
pub mod pipeline;
pub mod product;
pub mod selector;
pub mod source;
pub mod store;

pub use error::LoadError;
pub use group::{KNOWN_GROUPS, ProductGroup, normalize_category};
pub use images::{ImageRef, ImageResolver, PLACEHOLDER_IMAGE};
pub use money::format_price;
pub use pipeline::{CategoryOption, category_options, derive, featured};
pub use product::{Availability, Product};
pub use selector::{CATEGORY_PARAM, CategorySelector};
pub use source::{CatalogSource, DEFAULT_CATALOG_URL, HttpCatalogSource, InMemoryCatalogSource};
pub use store::{CatalogState, CatalogStore};
