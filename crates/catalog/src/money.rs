use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount as dollars with exactly two decimals (`$1299.00`).
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}
