//! Common utilities module
//!
//! Shared error types for the padding engine.

pub mod error;

pub use error::{PadError, Result};
