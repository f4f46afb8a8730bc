//! Data models
//!
//! Shared between the HTTP transport and the inventory core.

pub mod card;
pub mod payload;

// Re-exports
pub use card::*;
pub use payload::*;
