//! Card Inventory - client-side coordinator for a collectible card inventory
//!
//! Keeps a local snapshot of cards reconciled with the remote [`CardStore`],
//! suppresses duplicate actions per card, and gates checkout of the last copy
//! behind an explicit confirmation.
//!
//! # Example
//!
//! ```ignore
//! let inventory = Inventory::new(Arc::new(HttpCardStore::new(transport)));
//! inventory.load().await?;
//! match inventory.checkout(&id, Confirmation::Unconfirmed).await? {
//!     ActionOutcome::NeedsConfirmation => { /* ask, then retry confirmed */ }
//!     ActionOutcome::Completed(card) => println!("{} left", card.remaining()),
//!     ActionOutcome::Suppressed => {}
//! }
//! ```

pub mod config;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod events;
pub mod logger;
pub mod store;
pub mod tracker;
pub mod workflow;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use config::InventoryConfig;
pub use coordinator::{ActionOutcome, CommandOutput, Inventory, InventoryCommand};
pub use error::{InventoryError, InventoryResult};
pub use events::InventoryEvent;
pub use store::{InventoryStore, is_low_stock, is_out_of_stock};
pub use tracker::{ActionGuard, ActionKind, GlobalFlag, OperationTracker};
pub use workflow::{CheckoutPlan, Confirmation, ReturnPlan, plan_checkout, plan_return};

pub use card_client::CardStore;
pub use shared::models::{Card, CardId, CardPayload};
