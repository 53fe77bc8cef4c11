//! Asynchronous checkout processing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use refurb_core::{CheckoutId, DomainError};

use crate::cart::CartLine;
use crate::store::CartStore;

/// Default time the simulated processor takes.
pub const DEFAULT_CHECKOUT_DELAY: Duration = Duration::from_millis(1500);

/// Handle to a begun checkout. Pass it back to [`CartStore::complete_checkout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub checkout_id: CheckoutId,
    pub started_at: DateTime<Utc>,
}

/// What was committed by a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub checkout_id: CheckoutId,
    /// Cart contents at completion time.
    pub lines: Vec<CartLine>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub savings: Decimal,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Work done between begin and completion. There is no payment integration;
/// processing always succeeds.
#[async_trait]
pub trait CheckoutProcessor: Send + Sync {
    async fn process(&self, pending: &PendingCheckout);
}

/// Waits a fixed delay to stand in for order submission.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKOUT_DELAY)
    }
}

#[async_trait]
impl CheckoutProcessor for SimulatedProcessor {
    async fn process(&self, pending: &PendingCheckout) {
        debug!(checkout_id = %pending.checkout_id, delay_ms = self.delay.as_millis() as u64, "processing checkout");
        tokio::time::sleep(self.delay).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed(CheckoutReceipt),
    /// Another checkout was already in flight; nothing was done.
    Suppressed,
}

/// Run a full checkout: begin, process, complete.
///
/// The store lock is released while `processor` runs, so the cart stays
/// readable (and editable) during processing; whatever is in the cart when
/// processing ends is what gets committed.
pub async fn process_checkout<P>(store: &Mutex<CartStore>, processor: &P) -> Result<CheckoutOutcome, DomainError>
where
    P: CheckoutProcessor + ?Sized,
{
    let pending = {
        let mut guard = store.lock().await;
        match guard.begin_checkout() {
            Some(pending) => pending,
            None => {
                info!("checkout already in progress");
                return Ok(CheckoutOutcome::Suppressed);
            }
        }
    };

    processor.process(&pending).await;

    let mut guard = store.lock().await;
    let receipt = guard.complete_checkout(pending)?;
    Ok(CheckoutOutcome::Completed(receipt))
}
