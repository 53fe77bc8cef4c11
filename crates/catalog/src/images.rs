//! Display images for products and categories.
//!
//! Resolution order for a product is: per-product override, then the image of
//! its (normalized) category, then a generic placeholder. Lookups are plain
//! in-memory table reads and never fail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use refurb_core::ProductId;

use crate::group::normalize_category;

/// Image shown when neither an override nor a category image exists.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=300&width=400&text=Product";

/// Category images shipped with the storefront, keyed by normalized category.
const DEFAULT_CATEGORY_IMAGES: [(&str, &str); 4] = [
    ("Laptop", "/Laptop.jpg?height=300&width=400&text=Laptop"),
    ("Tablet", "/Tablet.jpeg?height=300&width=400&text=Tablet"),
    ("Mobile", "/iphone.jpeg?height=300&width=400&text=Mobile"),
    ("Accessories", "/headphones.jpeg?height=300&width=400&text=Accessories"),
];

/// Reference to a displayable image (path or URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_IMAGE
    }
}

impl core::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image lookup tables for one session.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    overrides: HashMap<ProductId, ImageRef>,
    categories: HashMap<String, ImageRef>,
    placeholder: ImageRef,
}

impl ImageResolver {
    /// Resolver with no overrides and no category images.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            categories: HashMap::new(),
            placeholder: ImageRef::new(PLACEHOLDER_IMAGE),
        }
    }

    /// Resolver seeded with the storefront's stock category images.
    pub fn with_default_category_images() -> Self {
        let mut resolver = Self::new();
        for (category, path) in DEFAULT_CATEGORY_IMAGES {
            resolver.register_category_image(category, path);
        }
        resolver
    }

    /// Insert or replace the image for one product. Empty arguments are ignored.
    pub fn register_override(&mut self, product_id: &str, image: &str) {
        if product_id.is_empty() || image.is_empty() {
            return;
        }
        self.overrides.insert(ProductId::from(product_id), ImageRef::new(image));
    }

    /// Insert or replace the fallback image for a category. Empty arguments are ignored.
    pub fn register_category_image(&mut self, group: &str, image: &str) {
        if group.is_empty() || image.is_empty() {
            return;
        }
        self.categories
            .insert(normalize_category(group).to_string(), ImageRef::new(image));
    }

    /// Image for a product.
    pub fn resolve(&self, product_id: &str, group: &str) -> &ImageRef {
        if let Some(image) = self.overrides.get(product_id) {
            return image;
        }
        self.category_image(group)
    }

    /// Image for a category card (no product involved).
    pub fn category_image(&self, group: &str) -> &ImageRef {
        self.categories
            .get(normalize_category(group))
            .unwrap_or(&self.placeholder)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}
