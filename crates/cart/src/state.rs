//! Cart state: the ordered, id-unique list of cart entries.

use common::{CartEntry, EntryValidationError, Product, ProductId, validate_entries};
use serde::Serialize;

use crate::command::CartCommand;
use crate::events::CartEvent;

/// The full set of cart entries at a point in time.
///
/// Invariants:
/// - no two entries share a product id
/// - every entry has `quantity >= 1`
///
/// Entries keep insertion order. Mutations go through [`CartState::execute`]
/// (or the `add_to_cart` / `increment` / `decrement` shorthands), which
/// decide events from the current state and then apply them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CartState {
    entries: Vec<CartEntry>,
}

// Query methods
impl CartState {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from previously persisted entries, checking invariants.
    pub fn from_entries(entries: Vec<CartEntry>) -> Result<Self, EntryValidationError> {
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    /// Returns the entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    /// Returns the entry for a product, if present.
    pub fn get(&self, id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the quantity of a product, 0 if absent.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.get(id).map_or(0, |entry| entry.quantity)
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }
}

// Command methods
impl CartState {
    /// Decides which events a command produces against the current state.
    ///
    /// Pure: the state is not modified. An empty result means the command
    /// has no effect (unknown product, or a quantity already at `u32::MAX`).
    pub fn decide(&self, command: &CartCommand) -> Vec<CartEvent> {
        match command {
            CartCommand::AddToCart(product) => match self.get(&product.id) {
                // Re-adding keeps the first title/price snapshot.
                Some(existing) => Self::increase(existing),
                None => vec![CartEvent::ItemAdded(CartEntry::from_product(
                    product.clone(),
                ))],
            },
            CartCommand::Increment(id) => self.get(id).map(Self::increase).unwrap_or_default(),
            CartCommand::Decrement(id) => match self.get(id) {
                Some(existing) if existing.quantity > 1 => vec![CartEvent::QuantityDecreased {
                    id: existing.id.clone(),
                    quantity: existing.quantity - 1,
                }],
                Some(existing) => vec![CartEvent::ItemRemoved {
                    id: existing.id.clone(),
                }],
                None => vec![],
            },
        }
    }

    fn increase(existing: &CartEntry) -> Vec<CartEvent> {
        existing
            .quantity
            .checked_add(1)
            .map(|quantity| CartEvent::QuantityIncreased {
                id: existing.id.clone(),
                quantity,
            })
            .into_iter()
            .collect()
    }

    /// Applies an event to the state.
    ///
    /// Deterministic and infallible; events that no longer match the state
    /// (e.g. a quantity change for a product that is gone) are ignored.
    pub fn apply(&mut self, event: CartEvent) {
        match event {
            CartEvent::ItemAdded(entry) => {
                if !self.contains(&entry.id) && entry.quantity > 0 {
                    self.entries.push(entry);
                }
            }
            CartEvent::QuantityIncreased { id, quantity }
            | CartEvent::QuantityDecreased { id, quantity } => {
                if quantity == 0 {
                    self.remove(&id);
                } else if let Some(position) = self.position(&id) {
                    self.entries[position].quantity = quantity;
                }
            }
            CartEvent::ItemRemoved { id } => self.remove(&id),
        }
    }

    fn remove(&mut self, id: &ProductId) {
        if let Some(position) = self.position(id) {
            self.entries.remove(position);
        }
    }

    /// Decides and applies a command, returning the applied events.
    pub fn execute(&mut self, command: CartCommand) -> Vec<CartEvent> {
        let events = self.decide(&command);
        for event in &events {
            self.apply(event.clone());
        }
        events
    }

    /// Adds one unit of `product`. Returns true if the cart changed.
    pub fn add_to_cart(&mut self, product: Product) -> bool {
        !self.execute(CartCommand::AddToCart(product)).is_empty()
    }

    /// Adds one unit of an existing entry. Returns true if the cart changed.
    pub fn increment(&mut self, id: impl Into<ProductId>) -> bool {
        !self.execute(CartCommand::Increment(id.into())).is_empty()
    }

    /// Removes one unit of an existing entry. Returns true if the cart changed.
    pub fn decrement(&mut self, id: impl Into<ProductId>) -> bool {
        !self.execute(CartCommand::Decrement(id.into())).is_empty()
    }
}

impl TryFrom<Vec<CartEntry>> for CartState {
    type Error = EntryValidationError;

    fn try_from(entries: Vec<CartEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}
