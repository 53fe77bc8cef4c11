//! Shopping cart domain module (event-sourced).
//!
//! The `Cart` aggregate decides and applies line-item changes; `CartStore`
//! wraps it with total, never-failing operations for the session, and
//! `process_checkout` drives the asynchronous checkout flow.

pub mod cart;
pub mod checkout;
pub mod draft;
pub mod store;
pub mod summary;

pub use cart::{
    AddItem, BeginCheckout, Cart, CartCleared, CartCommand, CartEvent, CartLine, CheckoutCompleted,
    CheckoutStarted, ClearCart, CompleteCheckout, LineAdded, LineRemoved, QuantityChanged,
    RemoveItem, SetQuantity,
};
pub use checkout::{
    CheckoutOutcome, CheckoutProcessor, CheckoutReceipt, DEFAULT_CHECKOUT_DELAY, PendingCheckout,
    SimulatedProcessor, process_checkout,
};
pub use draft::DraftQuantities;
pub use store::CartStore;
pub use summary::CartSummary;
