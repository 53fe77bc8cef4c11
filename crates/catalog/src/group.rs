//! Product groups (categories) and the one place their labels are derived.

use serde::{Deserialize, Serialize};

/// Category tags the storefront knows about, in landing-page order.
pub const KNOWN_GROUPS: [&str; 4] = [
    ProductGroup::LAPTOP,
    ProductGroup::TABLET,
    ProductGroup::MOBILE,
    ProductGroup::ACCESSORY,
];

/// Map a group tag to its category key.
///
/// The catalog tags accessories in the singular while both the display label
/// and the category image table use the plural. Every other tag is used as-is.
/// An already-normalized key is returned unchanged.
pub fn normalize_category(tag: &str) -> &str {
    if tag == ProductGroup::ACCESSORY {
        ProductGroup::ACCESSORIES
    } else {
        tag
    }
}

/// Category tag of a product, carried verbatim from the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductGroup(String);

impl ProductGroup {
    pub const LAPTOP: &'static str = "Laptop";
    pub const TABLET: &'static str = "Tablet";
    pub const MOBILE: &'static str = "Mobile";
    pub const ACCESSORY: &'static str = "Accessory";
    const ACCESSORIES: &'static str = "Accessories";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Resolve user input (deep link, CLI flag) to one of the known tags.
    ///
    /// Matching ignores case and surrounding whitespace, and accepts the plural
    /// "Accessories". Anything else is `None`.
    pub fn parse_known(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(Self::ACCESSORIES) {
            return Some(Self::new(Self::ACCESSORY));
        }
        KNOWN_GROUPS
            .iter()
            .find(|tag| tag.eq_ignore_ascii_case(input))
            .map(|tag| Self::new(*tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for category image lookups.
    pub fn lookup_key(&self) -> &str {
        normalize_category(&self.0)
    }

    /// Label shown on product cards, filter buttons and cart lines.
    pub fn display_label(&self) -> &str {
        normalize_category(&self.0)
    }

    /// Heading used on landing-page category cards ("Laptops", "Accessories").
    pub fn plural_label(&self) -> String {
        if self.0 == Self::ACCESSORY {
            Self::ACCESSORIES.to_string()
        } else {
            format!("{}s", self.0)
        }
    }

    /// Short blurb for the landing-page category card, if the tag is known.
    pub fn tagline(&self) -> Option<&'static str> {
        match self.0.as_str() {
            Self::LAPTOP => Some("Powerful computers for work and play"),
            Self::TABLET => Some("Portable devices for entertainment"),
            Self::MOBILE => Some("Smartphones with great features"),
            Self::ACCESSORY => Some("Essential add-ons for your devices"),
            _ => None,
        }
    }
}

impl core::fmt::Display for ProductGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductGroup {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for ProductGroup {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductGroup {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
