//! Inventory change notifications

use serde::Serialize;
use shared::error::ErrorInfo;
use shared::models::CardId;

/// Published on every store state change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InventoryEvent {
    /// Loading flag flipped
    Loading(bool),
    /// Whole snapshot replaced by a list load
    SnapshotReplaced { count: usize },
    CardAdded(CardId),
    CardUpdated(CardId),
    CardRemoved(CardId),
    /// An operation failed; mirrors the new `last_error`
    Failed(ErrorInfo),
}

/// Receiver capacity per subscriber; slow subscribers see `Lagged`
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
