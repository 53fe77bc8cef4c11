//! Session cart: total operations over the `Cart` aggregate.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use refurb_catalog::Product;
use refurb_core::{CheckoutId, DomainError, ProductId, SessionId};
use refurb_events::{EventBus, InMemoryEventBus, execute};

use crate::cart::{
    AddItem, BeginCheckout, Cart, CartCommand, CartEvent, CartLine, ClearCart, CompleteCheckout,
    RemoveItem, SetQuantity,
};
use crate::checkout::{CheckoutReceipt, PendingCheckout};
use crate::summary::CartSummary;

/// The shopper's cart for one session.
///
/// Every mutation is a command run through [`Cart`]; out-of-domain input
/// (zero quantities, unknown ids) is logged and dropped so callers never see
/// an error. Applied events go to the bus, when one is attached.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    bus: Option<Arc<InMemoryEventBus<CartEvent>>>,
}

impl CartStore {
    pub fn new(session: SessionId) -> Self {
        Self {
            cart: Cart::empty(session),
            bus: None,
        }
    }

    pub fn with_bus(session: SessionId, bus: Arc<InMemoryEventBus<CartEvent>>) -> Self {
        Self {
            cart: Cart::empty(session),
            bus: Some(bus),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, product: &Product, quantity: u32) {
        self.run(CartCommand::AddItem(AddItem {
            product: product.clone(),
            quantity,
            occurred_at: Utc::now(),
        }));
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        self.run(CartCommand::SetQuantity(SetQuantity {
            product_id: ProductId::from(product_id),
            quantity,
            occurred_at: Utc::now(),
        }));
    }

    pub fn remove_item(&mut self, product_id: &str) {
        self.run(CartCommand::RemoveItem(RemoveItem {
            product_id: ProductId::from(product_id),
            occurred_at: Utc::now(),
        }));
    }

    pub fn clear(&mut self) {
        self.run(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }));
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    pub fn savings(&self) -> Decimal {
        self.cart.savings()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.cart)
    }

    pub fn is_checkout_in_flight(&self) -> bool {
        self.cart.checkout_in_flight().is_some()
    }

    /// Mark a checkout as in flight.
    ///
    /// Returns `None` while another checkout is still being processed, so a
    /// repeated click is suppressed rather than queued.
    pub fn begin_checkout(&mut self) -> Option<PendingCheckout> {
        let checkout_id = CheckoutId::new();
        let started_at = Utc::now();
        let command = CartCommand::BeginCheckout(BeginCheckout {
            checkout_id,
            occurred_at: started_at,
        });

        match execute(&mut self.cart, &command) {
            Ok(events) => {
                self.publish(events);
                info!(%checkout_id, items = self.item_count(), "checkout started");
                Some(PendingCheckout {
                    checkout_id,
                    started_at,
                })
            }
            Err(err) => {
                debug!(%err, "checkout suppressed");
                None
            }
        }
    }

    /// Commit a begun checkout: snapshot the cart into a receipt and clear it.
    pub fn complete_checkout(&mut self, pending: PendingCheckout) -> Result<CheckoutReceipt, DomainError> {
        let lines = self.cart.lines().to_vec();
        let command = CartCommand::CompleteCheckout(CompleteCheckout {
            checkout_id: pending.checkout_id,
            occurred_at: Utc::now(),
        });

        let events = execute(&mut self.cart, &command)?;
        let receipt = events
            .iter()
            .find_map(|event| match event {
                CartEvent::CheckoutCompleted(e) => Some(CheckoutReceipt {
                    checkout_id: e.checkout_id,
                    lines: lines.clone(),
                    item_count: e.item_count,
                    subtotal: e.subtotal,
                    savings: e.savings,
                    started_at: pending.started_at,
                    completed_at: e.occurred_at,
                }),
                _ => None,
            })
            .ok_or(DomainError::NotFound)?;
        self.publish(events);

        info!(
            checkout_id = %receipt.checkout_id,
            items = receipt.item_count,
            subtotal = %receipt.subtotal,
            "checkout completed"
        );
        Ok(receipt)
    }

    /// Begin and immediately complete a checkout. `None` if one is already in flight.
    pub fn checkout(&mut self) -> Option<CheckoutReceipt> {
        let pending = self.begin_checkout()?;
        match self.complete_checkout(pending) {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                warn!(%err, "checkout could not be completed");
                None
            }
        }
    }

    fn run(&mut self, command: CartCommand) {
        match execute(&mut self.cart, &command) {
            Ok(events) if events.is_empty() => {
                debug!(?command, "cart command had no effect");
            }
            Ok(events) => {
                debug!(
                    events = events.len(),
                    version = refurb_core::AggregateRoot::version(&self.cart),
                    "cart updated"
                );
                self.publish(events);
            }
            Err(err) => {
                debug!(%err, ?command, "cart command ignored");
            }
        }
    }

    fn publish(&self, events: Vec<CartEvent>) {
        let Some(bus) = &self.bus else {
            return;
        };
        for event in events {
            if let Err(err) = bus.publish(event) {
                warn!(?err, "failed to publish cart event");
            }
        }
    }
}
