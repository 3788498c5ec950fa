//! Display read models built from cart snapshots.

pub mod cart_listing;
pub mod floating_cart;

pub use cart_listing::{CartListing, CartListingView, CartRow};
pub use floating_cart::{FloatingCart, FloatingCartView, item_label};
