//! Totals derived from the cart state.

use cart::CartState;
use common::Money;

/// Sum of `price * quantity` over every entry.
pub fn total_price(state: &CartState) -> Money {
    state.entries().iter().map(|entry| entry.subtotal()).sum()
}

/// Sum of quantities over every entry.
pub fn total_item_count(state: &CartState) -> u64 {
    state
        .entries()
        .iter()
        .map(|entry| u64::from(entry.quantity))
        .sum()
}
