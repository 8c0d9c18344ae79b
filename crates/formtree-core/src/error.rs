//! # Error Types
//!
//! Structural comparison and path parsing are total, so the only fallible
//! operation in this crate is reading JSON text into a [`Json`](crate::Json).

use thiserror::Error;

/// Error reading JSON text.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The text is not well-formed JSON.
    #[error("invalid JSON text: {0}")]
    Parse(#[from] serde_json::Error),
}
