//! Cart commands.

use common::{Product, ProductId};

/// A request to change the cart.
///
/// Commands are the only way to mutate a [`CartState`](crate::CartState).
/// They never fail: a command aimed at a product that is not in the cart
/// simply produces no events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit of a product, appending it if it is not in the cart yet.
    AddToCart(Product),

    /// Add one unit of a product already in the cart.
    Increment(ProductId),

    /// Remove one unit of a product; the entry goes away at zero.
    Decrement(ProductId),
}

impl CartCommand {
    /// Returns the command name, used for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::AddToCart(_) => "add_to_cart",
            CartCommand::Increment(_) => "increment",
            CartCommand::Decrement(_) => "decrement",
        }
    }

    /// Returns the product the command targets.
    pub fn product_id(&self) -> &ProductId {
        match self {
            CartCommand::AddToCart(product) => &product.id,
            CartCommand::Increment(id) | CartCommand::Decrement(id) => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::Money;

    use super::*;

    #[test]
    fn command_names() {
        let product = Product::new("p1", "Shirt", "u", Money::from_cents(2990));
        assert_eq!(CartCommand::AddToCart(product).name(), "add_to_cart");
        assert_eq!(CartCommand::Increment("p1".into()).name(), "increment");
        assert_eq!(CartCommand::Decrement("p1".into()).name(), "decrement");
    }

    #[test]
    fn command_product_id() {
        let product = Product::new("p7", "Mug", "u", Money::from_cents(500));
        assert_eq!(CartCommand::AddToCart(product).product_id().as_str(), "p7");
        assert_eq!(
            CartCommand::Decrement("p3".into()).product_id().as_str(),
            "p3"
        );
    }
}
