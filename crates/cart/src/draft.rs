//! Pending per-product quantities picked on the shop page before adding to cart.

use std::collections::HashMap;

use refurb_core::ProductId;

const DEFAULT_QUANTITY: u32 = 1;

/// Product id → draft quantity. Every product starts at 1 and never drops below it.
///
/// Purely presentational: nothing here reaches the cart until the caller
/// passes [`DraftQuantities::take`] to an add.
#[derive(Debug, Clone, Default)]
pub struct DraftQuantities {
    drafts: HashMap<ProductId, u32>,
}

impl DraftQuantities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, product_id: &str) -> u32 {
        self.drafts.get(product_id).copied().unwrap_or(DEFAULT_QUANTITY)
    }

    pub fn increment(&mut self, product_id: &str) -> u32 {
        let next = self.get(product_id).saturating_add(1);
        self.drafts.insert(ProductId::from(product_id), next);
        next
    }

    pub fn decrement(&mut self, product_id: &str) -> u32 {
        let next = self.get(product_id).saturating_sub(1).max(DEFAULT_QUANTITY);
        self.drafts.insert(ProductId::from(product_id), next);
        next
    }

    pub fn set(&mut self, product_id: &str, quantity: i64) -> u32 {
        let clamped = u32::try_from(quantity.max(i64::from(DEFAULT_QUANTITY))).unwrap_or(u32::MAX);
        self.drafts.insert(ProductId::from(product_id), clamped);
        clamped
    }

    /// Set from free-form text input. Anything that does not parse becomes 1.
    pub fn set_from_input(&mut self, product_id: &str, input: &str) -> u32 {
        let parsed = input.trim().parse::<i64>().unwrap_or(i64::from(DEFAULT_QUANTITY));
        self.set(product_id, parsed)
    }

    /// Return the draft for an add-to-cart and reset it to 1.
    pub fn take(&mut self, product_id: &str) -> u32 {
        self.drafts.remove(product_id).unwrap_or(DEFAULT_QUANTITY)
    }
}
