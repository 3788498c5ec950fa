//! View error types.

use thiserror::Error;

/// Errors that can occur while driving cart views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The cart manager reported an error.
    #[error("Cart error: {0}")]
    Cart(#[from] cart::CartError),

    /// A view-specific error.
    #[error("View error: {0}")]
    View(String),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
