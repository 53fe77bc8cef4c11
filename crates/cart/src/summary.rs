use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

/// Cart totals as shown in the cart panel.
///
/// No tax or shipping is applied, so `total == subtotal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub savings: Decimal,
    pub total: Decimal,
}

impl CartSummary {
    pub fn of(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        Self {
            item_count: cart.item_count(),
            subtotal,
            savings: cart.savings(),
            total: subtotal,
        }
    }

    /// Savings worth displaying. `None` when there is nothing saved.
    pub fn display_savings(&self) -> Option<Decimal> {
        (self.savings > Decimal::ZERO).then_some(self.savings)
    }
}
