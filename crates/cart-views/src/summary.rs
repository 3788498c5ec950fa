//! Cart summary: the numbers every display of the cart needs.

use cart::{CartSnapshot, Revision};
use common::Money;
use serde::Serialize;

use crate::format::CurrencyFormat;
use crate::totals::{total_item_count, total_price};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub revision: Revision,
    pub total_items: u64,
    pub total_price: Money,
    pub formatted_total: String,
}

impl CartSummary {
    /// Computes the summary of a snapshot.
    pub fn compute(snapshot: &CartSnapshot, format: &CurrencyFormat) -> Self {
        let total_price = total_price(snapshot.state());
        Self {
            revision: snapshot.revision(),
            total_items: total_item_count(snapshot.state()),
            total_price,
            formatted_total: format.format(total_price),
        }
    }

    /// Summary of an empty cart at the initial revision.
    pub fn empty(format: &CurrencyFormat) -> Self {
        Self {
            revision: Revision::initial(),
            total_items: 0,
            total_price: Money::zero(),
            formatted_total: format.format(Money::zero()),
        }
    }
}
