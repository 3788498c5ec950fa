//! Cart state management.
//!
//! This crate owns the shopping cart:
//! - [`CartState`] with the add / increment / decrement rules
//! - [`CartCommand`] and [`CartEvent`] describing mutations
//! - [`CartManager`], the single writer that loads the cart, publishes
//!   [`CartSnapshot`]s to subscribers and saves them in the background

pub mod command;
pub mod error;
pub mod events;
pub mod manager;
pub mod persistence;
pub mod revision;
pub mod snapshot;
pub mod state;

pub use command::CartCommand;
pub use error::{CartError, Result};
pub use events::CartEvent;
pub use manager::{CartManager, LoadOutcome};
pub use persistence::PersistStatus;
pub use revision::Revision;
pub use snapshot::{CartSnapshot, CartSubscriber};
pub use state::CartState;
