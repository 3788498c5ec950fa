//! JSON payload encoding shared by all store backends.
//!
//! The payload is a bare JSON array of cart entries, with no envelope and no
//! schema version, so payloads written by earlier builds stay readable.

use common::{CartEntry, validate_entries};

use crate::{Result, StoreError, StoreKey};

/// Serializes entries into the persisted payload.
pub fn encode(entries: &[CartEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Serializes entries into a JSON value (for JSON-typed columns).
pub fn encode_value(entries: &[CartEntry]) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(entries)?)
}

/// Parses a payload and checks the cart invariants.
pub fn decode(key: &StoreKey, payload: &str) -> Result<Vec<CartEntry>> {
    let entries: Vec<CartEntry> = serde_json::from_str(payload)?;
    check(key, entries)
}

/// Parses a JSON value and checks the cart invariants.
pub fn decode_value(key: &StoreKey, payload: serde_json::Value) -> Result<Vec<CartEntry>> {
    let entries: Vec<CartEntry> = serde_json::from_value(payload)?;
    check(key, entries)
}

fn check(key: &StoreKey, entries: Vec<CartEntry>) -> Result<Vec<CartEntry>> {
    validate_entries(&entries).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    Ok(entries)
}
