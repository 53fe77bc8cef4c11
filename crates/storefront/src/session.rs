//! One shopper session: catalog, images, cart and the current filter.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use refurb_cart::{
    CartEvent, CartStore, CheckoutOutcome, CheckoutProcessor, DraftQuantities, SimulatedProcessor,
    process_checkout,
};
use refurb_catalog::{
    CatalogSource, CatalogStore, CategorySelector, ImageResolver, category_options, derive, featured,
};
use refurb_core::SessionId;
use refurb_events::InMemoryEventBus;

use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::views::{CartView, LandingView, ProductCard, ShopView};

/// Session state behind the landing page, the shop page and the cart panel.
pub struct Storefront {
    session: SessionId,
    catalog: CatalogStore,
    images: ImageResolver,
    cart: Arc<Mutex<CartStore>>,
    events: Arc<InMemoryEventBus<CartEvent>>,
    drafts: DraftQuantities,
    selector: CategorySelector,
    processor: Arc<dyn CheckoutProcessor>,
}

impl Storefront {
    /// Start a session. `deep_link` is the `category` value or query string
    /// the shop page was opened with (empty for none).
    pub fn new(deep_link: &str, processor: Arc<dyn CheckoutProcessor>) -> Self {
        let session = SessionId::new();
        let events = Arc::new(InMemoryEventBus::new());
        let selector = CategorySelector::from_query(deep_link);
        debug!(%session, selector = selector.label(), "storefront session started");

        Self {
            session,
            catalog: CatalogStore::new(),
            images: ImageResolver::with_default_category_images(),
            cart: Arc::new(Mutex::new(CartStore::with_bus(session, Arc::clone(&events)))),
            events,
            drafts: DraftQuantities::new(),
            selector,
            processor,
        }
    }

    /// Session with the simulated checkout processor configured in `config`.
    pub fn from_config(config: &StorefrontConfig, deep_link: &str) -> Self {
        Self::new(deep_link, Arc::new(SimulatedProcessor::new(config.checkout_delay)))
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn images_mut(&mut self) -> &mut ImageResolver {
        &mut self.images
    }

    pub fn drafts_mut(&mut self) -> &mut DraftQuantities {
        &mut self.drafts
    }

    pub fn cart(&self) -> &Arc<Mutex<CartStore>> {
        &self.cart
    }

    /// Bus carrying every applied cart event of this session.
    pub fn events(&self) -> &Arc<InMemoryEventBus<CartEvent>> {
        &self.events
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    /// Load the catalog once. Returns the number of products loaded.
    pub async fn load_catalog<S>(&self, source: &S) -> Result<usize, StorefrontError>
    where
        S: CatalogSource + ?Sized,
    {
        let products = self.catalog.load(source).await?;
        Ok(products.len())
    }

    pub fn select_category(&mut self, selector: CategorySelector) {
        debug!(selector = selector.label(), "category selected");
        self.selector = selector;
    }

    pub fn shop_view(&self) -> ShopView {
        let catalog = self.catalog.all();
        let products = derive(&catalog, &self.selector)
            .iter()
            .map(|p| ProductCard::build(p, &self.images, &self.drafts))
            .collect();

        ShopView {
            state: self.catalog.state(),
            selector: self.selector.clone(),
            options: category_options(&self.catalog.groups()),
            products,
        }
    }

    pub fn landing_view(&self) -> LandingView {
        let catalog = self.catalog.all();
        LandingView {
            featured: featured(&catalog)
                .iter()
                .map(|p| ProductCard::build(p, &self.images, &self.drafts))
                .collect(),
            categories: LandingView::categories(&self.images),
        }
    }

    /// Add the product's draft quantity to the cart and reset the draft.
    ///
    /// Returns the quantity added. Unknown or unavailable products, and
    /// quantities the cart refuses, are rejected and leave the draft untouched.
    pub async fn add_to_cart(&mut self, product_id: &str) -> Result<u32, StorefrontError> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| StorefrontError::UnknownProduct(product_id.to_string()))?;
        if !product.is_available() {
            return Err(StorefrontError::ProductUnavailable(product_id.to_string()));
        }

        let quantity = self.drafts.get(product_id);
        let mut cart = self.cart.lock().await;
        let before = cart.line(product_id).map(|l| l.quantity);
        cart.add_item(&product, quantity);
        let after = cart.line(product_id).map(|l| l.quantity);
        drop(cart);

        if before == after {
            warn!(product_id, quantity, "cart rejected add");
            return Err(StorefrontError::CartRejected {
                product_id: product_id.to_string(),
                quantity,
            });
        }

        self.drafts.take(product_id);
        info!(product_id, quantity, "added to cart");
        Ok(quantity)
    }

    pub async fn cart_view(&self) -> CartView {
        let cart = self.cart.lock().await;
        CartView {
            lines: cart.lines().to_vec(),
            summary: cart.summary(),
            checkout_in_flight: cart.is_checkout_in_flight(),
        }
    }

    /// Run checkout through the session's processor.
    ///
    /// A second call while one is processing returns `Suppressed`.
    pub async fn checkout(&self) -> Result<CheckoutOutcome, StorefrontError> {
        let outcome = process_checkout(&self.cart, self.processor.as_ref()).await?;
        Ok(outcome)
    }
}

impl core::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Storefront")
            .field("session", &self.session)
            .field("catalog", &self.catalog.state())
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refurb_catalog::{Availability, InMemoryCatalogSource, LoadError, Product};
    use refurb_events::EventBus;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn product(id: &str, group: &str, status: Availability) -> Product {
        Product::new(id, id, group, Decimal::new(20, 0), Decimal::new(15, 0), status)
    }

    fn fixture() -> InMemoryCatalogSource {
        InMemoryCatalogSource::from_products(vec![
            product("a", "Laptop", Availability::Available),
            product("b", "Laptop", Availability::Unavailable),
            product("c", "Tablet", Availability::Available),
            product("d", "Accessory", Availability::Available),
        ])
    }

    fn storefront(deep_link: &str) -> Storefront {
        Storefront::new(deep_link, Arc::new(SimulatedProcessor::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn deep_link_sets_initial_selector() {
        let store = storefront("?category=laptop");
        store.load_catalog(&fixture()).await.unwrap();

        let view = store.shop_view();
        assert_eq!(view.selector, CategorySelector::group("Laptop"));
        let ids: Vec<&str> = view.products.iter().map(|c| c.product.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn shop_view_orders_available_first() {
        let store = storefront("");
        store.load_catalog(&fixture()).await.unwrap();

        let view = store.shop_view();
        let ids: Vec<&str> = view.products.iter().map(|c| c.product.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d", "b"]);

        let labels: Vec<&str> = view.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["All", "Laptop", "Tablet", "Accessories"]);
    }

    #[tokio::test]
    async fn add_to_cart_uses_and_resets_draft() {
        let mut store = storefront("");
        store.load_catalog(&fixture()).await.unwrap();

        store.drafts_mut().set("a", 3);
        assert_eq!(store.add_to_cart("a").await.unwrap(), 3);
        assert_eq!(store.shop_view().products[0].draft_quantity, 1);

        let cart = store.cart_view().await;
        assert_eq!(cart.summary.item_count, 3);
        assert_eq!(cart.subtotal(), "$45.00");
        assert_eq!(cart.savings().as_deref(), Some("$15.00"));
    }

    #[tokio::test]
    async fn unavailable_and_unknown_products_are_rejected() {
        let mut store = storefront("");
        store.load_catalog(&fixture()).await.unwrap();
        store.drafts_mut().set("b", 2);

        assert!(matches!(
            store.add_to_cart("b").await,
            Err(StorefrontError::ProductUnavailable(_))
        ));
        assert!(matches!(
            store.add_to_cart("zzz").await,
            Err(StorefrontError::UnknownProduct(_))
        ));
        assert!(store.cart_view().await.is_empty());
        assert_eq!(store.drafts_mut().get("b"), 2);
    }

    #[tokio::test]
    async fn refused_quantity_is_an_error_and_keeps_draft() {
        let mut store = storefront("");
        let big = Product::new(
            "big",
            "Big",
            "Laptop",
            Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0),
            Decimal::from_i128_with_scale(4 * 10i128.pow(28), 0),
            Availability::Available,
        );
        store
            .load_catalog(&InMemoryCatalogSource::from_products(vec![big]))
            .await
            .unwrap();
        store.drafts_mut().set("big", 2);

        let err = store.add_to_cart("big").await.unwrap_err();
        match err {
            StorefrontError::CartRejected { product_id, quantity } => {
                assert_eq!(product_id, "big");
                assert_eq!(quantity, 2);
            }
            _ => panic!("Expected CartRejected error"),
        }
        assert!(store.cart_view().await.is_empty());
        assert_eq!(store.drafts_mut().get("big"), 2);

        store.drafts_mut().set("big", 1);
        assert_eq!(store.add_to_cart("big").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_load_reports_error_state() {
        let store = storefront("");
        let err = store
            .load_catalog(&InMemoryCatalogSource::failing(LoadError::Status(500)))
            .await
            .unwrap_err();

        assert!(matches!(err, StorefrontError::CatalogLoad(LoadError::Status(500))));
        let view = store.shop_view();
        assert!(view.products.is_empty());
        assert!(view.error_message().is_some());
    }

    #[tokio::test]
    async fn checkout_clears_cart_and_publishes_events() {
        let mut store = storefront("");
        let events = store.events().subscribe();
        store.load_catalog(&fixture()).await.unwrap();
        store.add_to_cart("c").await.unwrap();

        match store.checkout().await.unwrap() {
            CheckoutOutcome::Completed(receipt) => assert_eq!(receipt.item_count, 1),
            CheckoutOutcome::Suppressed => panic!("Expected completed checkout"),
        }
        assert!(store.cart_view().await.is_empty());

        let types: Vec<&str> = events
            .drain()
            .iter()
            .map(refurb_events::Event::event_type)
            .collect();
        assert_eq!(
            types,
            vec!["cart.line.added", "cart.checkout.started", "cart.checkout.completed"]
        );
    }
}
