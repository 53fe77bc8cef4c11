//! Storefront session: wires the catalog, image resolver and cart together
//! and derives what the landing page, shop page and cart panel show.

pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod views;

pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use session::Storefront;
pub use views::{CartView, CategoryCard, LandingView, ProductCard, ShopView};
