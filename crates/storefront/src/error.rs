use refurb_catalog::LoadError;
use refurb_core::DomainError;

/// Errors surfaced by a storefront session.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Unavailable products are listed but cannot be added to the cart.
    #[error("product is unavailable: {0}")]
    ProductUnavailable(String),

    /// The cart refused the quantity (it would overflow the line or the totals).
    #[error("cart rejected {quantity} x {product_id}")]
    CartRejected { product_id: String, quantity: u32 },

    #[error("catalog load failed: {0}")]
    CatalogLoad(#[from] LoadError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
