//! Shared types for the card inventory
//!
//! Card model, edit payloads, stock-state derivation, API envelopes and the
//! normalized error taxonomy used by both the transport and the inventory core.

pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod serde_helpers;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ErrorInfo, ErrorKind, FieldErrors};
pub use models::{Card, CardId, CardPayload, ImageChange, PendingImage, Rarity, StockState};
pub use response::{ApiEnvelope, ApiErrorBody};
