//! Presentation-ready snapshots of the session state.

use refurb_cart::{CartLine, CartSummary, DraftQuantities};
use refurb_catalog::{
    CATEGORY_PARAM, CatalogState, CategoryOption, CategorySelector, ImageRef, ImageResolver,
    KNOWN_GROUPS, Product, ProductGroup, format_price,
};

/// A product tile on the shop or landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product: Product,
    pub image: ImageRef,
    pub category_label: String,
    pub price: String,
    /// List price, shown struck through next to `price`.
    pub msrp: String,
    pub draft_quantity: u32,
}

impl ProductCard {
    pub fn build(product: &Product, images: &ImageResolver, drafts: &DraftQuantities) -> Self {
        Self {
            image: images
                .resolve(product.id().as_str(), product.group().as_str())
                .clone(),
            category_label: product.group().display_label().to_string(),
            price: format_price(product.price()),
            msrp: format_price(product.msrp()),
            draft_quantity: drafts.get(product.id().as_str()),
            product: product.clone(),
        }
    }

    /// `false` renders as "Sold Out" with no add button.
    pub fn can_add_to_cart(&self) -> bool {
        self.product.is_available()
    }
}

/// A landing-page category card linking into the filtered shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub group: ProductGroup,
    pub title: String,
    pub tagline: Option<&'static str>,
    pub image: ImageRef,
    pub link: String,
}

impl CategoryCard {
    pub fn build(group: ProductGroup, images: &ImageResolver) -> Self {
        Self {
            title: group.plural_label(),
            tagline: group.tagline(),
            image: images.category_image(group.as_str()).clone(),
            link: format!("/shop?{CATEGORY_PARAM}={}", group.as_str()),
            group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingView {
    pub featured: Vec<ProductCard>,
    pub categories: Vec<CategoryCard>,
}

impl LandingView {
    pub fn categories(images: &ImageResolver) -> Vec<CategoryCard> {
        KNOWN_GROUPS
            .iter()
            .map(|tag| CategoryCard::build(ProductGroup::new(*tag), images))
            .collect()
    }
}

/// The shop page: filter buttons plus the derived listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopView {
    pub state: CatalogState,
    pub selector: CategorySelector,
    pub options: Vec<CategoryOption>,
    pub products: Vec<ProductCard>,
}

impl ShopView {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, CatalogState::NotLoaded | CatalogState::Loading)
    }

    /// Message for the error view, if the last load failed.
    pub fn error_message(&self) -> Option<&'static str> {
        match &self.state {
            CatalogState::Failed { error } => Some(error.user_message()),
            _ => None,
        }
    }
}

/// The cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
    pub checkout_in_flight: bool,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> String {
        format_price(self.summary.subtotal)
    }

    pub fn total(&self) -> String {
        format_price(self.summary.total)
    }

    /// `None` when the cart saves nothing against list price.
    pub fn savings(&self) -> Option<String> {
        self.summary.display_savings().map(format_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refurb_catalog::{Availability, LoadError};
    use rust_decimal::Decimal;

    fn accessory() -> Product {
        Product::new(
            "acc-1",
            "Headphones",
            "Accessory",
            Decimal::new(12999, 2),
            Decimal::new(8900, 2),
            Availability::Available,
        )
    }

    #[test]
    fn product_card_uses_normalized_label_and_image() {
        let images = ImageResolver::with_default_category_images();
        let card = ProductCard::build(&accessory(), &images, &DraftQuantities::new());

        assert_eq!(card.category_label, "Accessories");
        assert_eq!(card.image, *images.category_image("Accessories"));
        assert_eq!(card.price, "$89.00");
        assert_eq!(card.msrp, "$129.99");
        assert_eq!(card.draft_quantity, 1);
        assert!(card.can_add_to_cart());
    }

    #[test]
    fn category_cards_follow_landing_order() {
        let cards = LandingView::categories(&ImageResolver::with_default_category_images());

        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Laptops", "Tablets", "Mobiles", "Accessories"]);
        assert_eq!(cards[3].link, "/shop?category=Accessory");
        assert!(cards.iter().all(|c| !c.image.is_placeholder()));
    }

    #[test]
    fn failed_state_exposes_user_message() {
        let view = ShopView {
            state: CatalogState::Failed {
                error: LoadError::Status(500),
            },
            selector: CategorySelector::All,
            options: Vec::new(),
            products: Vec::new(),
        };

        assert!(!view.is_loading());
        assert_eq!(
            view.error_message(),
            Some("Error loading products. Please try again later.")
        );
    }
}
