//! `refurb-core`: storefront foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog and cart
//! crates (no IO, no HTTP).

pub mod aggregate;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::DomainError;
pub use id::{CheckoutId, ProductId, SessionId};
