use std::time::Duration;

use refurb_cart::CheckoutOutcome;
use refurb_catalog::{CatalogState, CategorySelector, HttpCatalogSource};
use refurb_storefront::{Storefront, StorefrontConfig, StorefrontError, render};
use rust_decimal::Decimal;

const CATALOG: &str = r#"[
    {"id":"lap-1","name":"ThinkPad T480","group":"Laptop","msrp":899.99,"price":349,"status":"Available"},
    {"id":"lap-2","name":"MacBook Air","group":"Laptop","msrp":999,"price":499,"status":"Unavailable"},
    {"id":"tab-1","name":"iPad Air","group":"Tablet","msrp":599,"price":299.5,"status":"Available"},
    {"id":"mob-1","name":"Pixel 6","group":"Mobile","msrp":599,"price":199,"status":"Sold"},
    {"id":"acc-1","name":"AirPods Pro","group":"Accessory","msrp":249,"price":129,"status":"Available"}
]"#;

async fn serve(status: usize, body: &str) -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/products.json")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
    server
}

fn config_for(server: &mockito::ServerGuard) -> StorefrontConfig {
    StorefrontConfig {
        catalog_url: format!("{}/products.json", server.url()),
        http_timeout: Duration::from_secs(5),
        checkout_delay: Duration::ZERO,
    }
}

async fn loaded_storefront(server: &mockito::ServerGuard, deep_link: &str) -> Storefront {
    let config = config_for(server);
    let storefront = Storefront::from_config(&config, deep_link);
    let source = HttpCatalogSource::new(&config.catalog_url, config.http_timeout).unwrap();
    storefront.load_catalog(&source).await.unwrap();
    storefront
}

#[tokio::test]
async fn shop_lists_available_products_first() {
    let server = serve(200, CATALOG).await;
    let storefront = loaded_storefront(&server, "").await;

    assert_eq!(storefront.catalog().state(), CatalogState::Loaded { count: 5 });

    let view = storefront.shop_view();
    let ids: Vec<&str> = view.products.iter().map(|c| c.product.id().as_str()).collect();
    assert_eq!(ids, vec!["lap-1", "tab-1", "acc-1", "lap-2", "mob-1"]);

    let rendered = render::shop(&view);
    assert!(rendered.contains("[All]"));
    assert!(rendered.contains("$349.00 (was $899.99)"));
    assert!(rendered.contains("$299.50"));
    assert!(rendered.contains("Sold Out"));
}

#[tokio::test]
async fn deep_link_filters_by_category() {
    let server = serve(200, CATALOG).await;
    let mut storefront = loaded_storefront(&server, "?category=Accessories").await;

    let view = storefront.shop_view();
    assert_eq!(view.selector, CategorySelector::group("Accessory"));
    assert_eq!(view.products.len(), 1);
    assert_eq!(view.products[0].category_label, "Accessories");
    assert_eq!(
        view.products[0].image.as_str(),
        "/headphones.jpeg?height=300&width=400&text=Accessories"
    );

    storefront.select_category(CategorySelector::from_query("Laptop"));
    let ids: Vec<String> = storefront
        .shop_view()
        .products
        .iter()
        .map(|c| c.product.id().to_string())
        .collect();
    assert_eq!(ids, vec!["lap-1", "lap-2"]);
}

#[tokio::test]
async fn unknown_deep_link_shows_everything() {
    let server = serve(200, CATALOG).await;
    let storefront = loaded_storefront(&server, "category=Drones").await;

    assert_eq!(storefront.shop_view().selector, CategorySelector::All);
    assert_eq!(storefront.shop_view().products.len(), 5);
}

#[tokio::test]
async fn landing_features_first_available_per_category() {
    let server = serve(200, CATALOG).await;
    let storefront = loaded_storefront(&server, "").await;

    let view = storefront.landing_view();
    let ids: Vec<&str> = view.featured.iter().map(|c| c.product.id().as_str()).collect();
    assert_eq!(ids, vec!["lap-1", "tab-1", "acc-1"]);
    assert_eq!(view.categories.len(), 4);
}

#[tokio::test]
async fn override_takes_precedence_over_category_image() {
    let server = serve(200, CATALOG).await;
    let mut storefront = loaded_storefront(&server, "").await;
    storefront.images_mut().register_override("tab-1", "/ipad-air.png");

    let view = storefront.shop_view();
    let tablet = view
        .products
        .iter()
        .find(|c| c.product.id().as_str() == "tab-1")
        .unwrap();
    assert_eq!(tablet.image.as_str(), "/ipad-air.png");
}

#[tokio::test]
async fn cart_to_checkout() {
    let server = serve(200, CATALOG).await;
    let mut storefront = loaded_storefront(&server, "").await;

    storefront.drafts_mut().set("lap-1", 2);
    storefront.add_to_cart("lap-1").await.unwrap();
    storefront.add_to_cart("acc-1").await.unwrap();
    storefront.add_to_cart("acc-1").await.unwrap();

    let err = storefront.add_to_cart("lap-2").await.unwrap_err();
    assert!(matches!(err, StorefrontError::ProductUnavailable(_)));

    let cart = storefront.cart_view().await;
    assert_eq!(cart.summary.item_count, 4);
    assert_eq!(cart.summary.subtotal, Decimal::new(956, 0));
    assert_eq!(cart.total(), "$956.00");
    assert_eq!(cart.savings().as_deref(), Some("$1341.98"));

    match storefront.checkout().await.unwrap() {
        CheckoutOutcome::Completed(receipt) => {
            assert_eq!(receipt.item_count, 4);
            assert_eq!(receipt.lines.len(), 2);
        }
        CheckoutOutcome::Suppressed => panic!("Expected completed checkout"),
    }

    let cart = storefront.cart_view().await;
    assert!(cart.is_empty());
    assert_eq!(render::cart(&cart), "Your cart is empty\n");
}

#[tokio::test]
async fn failed_load_shows_error_view() {
    let server = serve(500, "").await;
    let config = config_for(&server);
    let storefront = Storefront::from_config(&config, "");
    let source = HttpCatalogSource::new(&config.catalog_url, config.http_timeout).unwrap();

    let err = storefront.load_catalog(&source).await.unwrap_err();
    assert!(matches!(err, StorefrontError::CatalogLoad(_)));
    assert!(storefront.catalog().all().is_empty());
    assert_eq!(
        render::shop(&storefront.shop_view()),
        "Error loading products. Please try again later.\n"
    );
}

#[tokio::test]
async fn malformed_catalog_is_a_load_failure() {
    let server = serve(200, r#"[{"id":"x"}]"#).await;
    let config = config_for(&server);
    let storefront = Storefront::from_config(&config, "");
    let source = HttpCatalogSource::new(&config.catalog_url, config.http_timeout).unwrap();

    assert!(storefront.load_catalog(&source).await.is_err());
    assert!(storefront.shop_view().error_message().is_some());
}
