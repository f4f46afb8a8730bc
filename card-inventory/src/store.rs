//! Inventory Store - local snapshot of cards reconciled with the server
//!
//! Every mutating call follows the same contract:
//!
//! 1. local precondition check (recorded as `last_error` on failure)
//! 2. `loading = true`, `last_error = None`
//! 3. remote call through the injected [`CardStore`]
//! 4. reconcile the snapshot from the server response, or record the error
//! 5. `loading = false` on every exit path ([`LoadingGuard`])
//!
//! The server is authoritative for quantities: the snapshot only ever takes
//! server responses, never local arithmetic.

use std::future::Future;
use std::sync::Arc;

use card_client::{CardStore, ClientError, ClientResult};
use parking_lot::RwLock;
use shared::error::ErrorInfo;
use shared::models::{Card, CardId, CardPayload};
use tokio::sync::broadcast;

use crate::error::{InventoryError, InventoryResult};
use crate::events::{EVENT_CHANNEL_CAPACITY, InventoryEvent};

/// Exactly one copy remains
pub fn is_low_stock(card: &Card) -> bool {
    card.is_low_stock()
}

/// Every copy is checked out
pub fn is_out_of_stock(card: &Card) -> bool {
    card.is_out_of_stock()
}

#[derive(Debug, Default)]
struct InventoryState {
    cards: Vec<Card>,
    /// Operations between step 2 and step 5
    pending: usize,
    last_error: Option<ErrorInfo>,
    current: Option<Card>,
}

/// Observable card snapshot plus loading/error state
pub struct InventoryStore {
    remote: Arc<dyn CardStore>,
    state: RwLock<InventoryState>,
    events: broadcast::Sender<InventoryEvent>,
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("InventoryStore")
            .field("cards", &state.cards.len())
            .field("loading", &(state.pending > 0))
            .field("last_error", &state.last_error)
            .finish()
    }
}

impl InventoryStore {
    pub fn new(remote: Arc<dyn CardStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            remote,
            state: RwLock::new(InventoryState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.events.subscribe()
    }

    // ========== Reads ==========

    /// Clone of the snapshot, server order
    pub fn cards(&self) -> Vec<Card> {
        self.state.read().cards.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().cards.is_empty()
    }

    /// Snapshot is non-empty
    pub fn is_loaded(&self) -> bool {
        !self.is_empty()
    }

    pub fn find(&self, id: &CardId) -> Option<Card> {
        self.state.read().cards.iter().find(|c| &c.id == id).cloned()
    }

    /// First card with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<Card> {
        self.state.read().cards.iter().find(|c| c.name == name).cloned()
    }

    pub fn loading(&self) -> bool {
        self.state.read().pending > 0
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.state.read().last_error.clone()
    }

    /// Card most recently fetched by id
    pub fn current(&self) -> Option<Card> {
        self.state.read().current.clone()
    }

    /// Dismiss the recorded error
    pub fn clear_error(&self) {
        self.state.write().last_error = None;
    }

    // ========== Operations ==========

    /// Replace the snapshot with the server's list
    pub async fn load(&self) -> InventoryResult<Vec<Card>> {
        let cards = self.call("list", None, self.remote.list()).await?;
        if let Some(bad) = cards.iter().find(|c| !c.is_consistent()) {
            tracing::warn!(
                card_id = %bad.id,
                checked_out = bad.checked_out_quantity,
                total = bad.total_quantity,
                "Inconsistent card in server list, snapshot not replaced"
            );
            return Err(self.fail(inconsistent(bad)));
        }

        let count = cards.len();
        self.state.write().cards = cards.clone();
        tracing::info!(count, "Inventory loaded");
        self.emit(InventoryEvent::SnapshotReplaced { count });
        Ok(cards)
    }

    /// Fetch one card, keep it as `current` and refresh its snapshot entry
    pub async fn fetch_card(&self, id: &CardId) -> InventoryResult<Card> {
        let card = self.call("get", Some(id), self.remote.get(id)).await?;
        let card = self.checked(card)?;

        let replaced = {
            let mut state = self.state.write();
            state.current = Some(card.clone());
            match state.cards.iter_mut().find(|c| c.id == card.id) {
                Some(slot) => {
                    *slot = card.clone();
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.emit(InventoryEvent::CardUpdated(card.id.clone()));
        }
        Ok(card)
    }

    pub async fn create(&self, payload: &CardPayload) -> InventoryResult<Card> {
        if let Err(fields) = payload.validate() {
            return Err(self.fail(InventoryError::Validation(fields)));
        }

        let card = self
            .call("create", None, self.remote.create(payload))
            .await?;
        let card = self.checked(card)?;

        self.state.write().cards.push(card.clone());
        tracing::info!(card_id = %card.id, name = %card.name, "Card created");
        self.emit(InventoryEvent::CardAdded(card.id.clone()));
        Ok(card)
    }

    pub async fn update(&self, id: &CardId, payload: &CardPayload) -> InventoryResult<Card> {
        if let Err(fields) = payload.validate() {
            return Err(self.fail(InventoryError::Validation(fields)));
        }
        if let Some(existing) = self.find(id)
            && payload.total_quantity < existing.checked_out_quantity
        {
            return Err(self.fail(InventoryError::field(
                "total_quantity",
                format!(
                    "Total quantity cannot be less than the {} copies checked out",
                    existing.checked_out_quantity
                ),
            )));
        }

        let card = self
            .call("update", Some(id), self.remote.update(id, payload))
            .await?;
        let card = self.checked(card)?;
        self.upsert("update", card.clone());
        Ok(card)
    }

    /// Remove a card; deleting an unknown card is a no-op
    pub async fn delete(&self, id: &CardId) -> InventoryResult<()> {
        self.call("delete", Some(id), self.remote.delete(id)).await?;

        let removed = {
            let mut state = self.state.write();
            let before = state.cards.len();
            state.cards.retain(|c| &c.id != id);
            if state.current.as_ref().is_some_and(|c| &c.id == id) {
                state.current = None;
            }
            state.cards.len() != before
        };
        if removed {
            tracing::info!(card_id = %id, "Card deleted");
            self.emit(InventoryEvent::CardRemoved(id.clone()));
        } else {
            tracing::debug!(card_id = %id, "Deleted card was not in the snapshot");
        }
        Ok(())
    }

    /// Check out one copy
    ///
    /// Refused locally when the snapshot already shows every copy checked
    /// out. A server conflict leaves the snapshot untouched.
    pub async fn checkout(&self, id: &CardId) -> InventoryResult<Card> {
        if self.find(id).is_some_and(|c| c.is_out_of_stock()) {
            return Err(self.fail(InventoryError::Unavailable(id.clone())));
        }

        let result = self.remote_call("checkout", Some(id), self.remote.checkout(id)).await;
        let card = match result {
            Ok(card) => self.checked(card)?,
            Err(ClientError::Conflict(message)) => {
                tracing::warn!(card_id = %id, %message, "Checkout rejected by server");
                return Err(self.fail(InventoryError::Unavailable(id.clone())));
            }
            Err(err) => return Err(self.fail(err.into())),
        };
        self.upsert("checkout", card.clone());
        Ok(card)
    }

    /// Return one copy
    pub async fn return_card(&self, id: &CardId) -> InventoryResult<Card> {
        if self.find(id).is_some_and(|c| c.checked_out_quantity == 0) {
            return Err(self.fail(InventoryError::NothingCheckedOut(id.clone())));
        }

        let result = self.remote_call("return", Some(id), self.remote.return_card(id)).await;
        let card = match result {
            Ok(card) => self.checked(card)?,
            Err(ClientError::Conflict(message)) => {
                tracing::warn!(card_id = %id, %message, "Return rejected by server");
                return Err(self.fail(InventoryError::NothingCheckedOut(id.clone())));
            }
            Err(err) => return Err(self.fail(err.into())),
        };
        self.upsert("return", card.clone());
        Ok(card)
    }

    // ========== Internals ==========

    /// Remote call with loading bookkeeping; the error is not recorded yet
    async fn remote_call<T>(
        &self,
        action: &'static str,
        id: Option<&CardId>,
        fut: impl Future<Output = ClientResult<T>>,
    ) -> ClientResult<T> {
        let _loading = LoadingGuard::begin(self);
        tracing::debug!(action, card_id = ?id.map(CardId::as_str), "Calling card store");
        fut.await
    }

    /// Remote call that records any failure as `last_error`
    async fn call<T>(
        &self,
        action: &'static str,
        id: Option<&CardId>,
        fut: impl Future<Output = ClientResult<T>>,
    ) -> InventoryResult<T> {
        self.remote_call(action, id, fut)
            .await
            .map_err(|err| self.fail(err.into()))
    }

    /// Reject server responses that break `checked_out <= total`
    fn checked(&self, card: Card) -> InventoryResult<Card> {
        if card.is_consistent() {
            Ok(card)
        } else {
            Err(self.fail(inconsistent(&card)))
        }
    }

    /// Replace by id, appending when the card is missing locally
    fn upsert(&self, action: &'static str, card: Card) {
        let replaced = {
            let mut state = self.state.write();
            if state.current.as_ref().is_some_and(|c| c.id == card.id) {
                state.current = Some(card.clone());
            }
            match state.cards.iter_mut().find(|c| c.id == card.id) {
                Some(slot) => {
                    *slot = card.clone();
                    true
                }
                None => {
                    state.cards.push(card.clone());
                    false
                }
            }
        };

        if replaced {
            tracing::info!(
                action,
                card_id = %card.id,
                checked_out = card.checked_out_quantity,
                total = card.total_quantity,
                "Card reconciled"
            );
            self.emit(InventoryEvent::CardUpdated(card.id));
        } else {
            tracing::warn!(action, card_id = %card.id, "Card missing from snapshot, appending");
            self.emit(InventoryEvent::CardAdded(card.id));
        }
    }

    /// Record the failure and hand it back
    pub(crate) fn fail(&self, err: InventoryError) -> InventoryError {
        let info = err.info();
        tracing::error!(kind = %info.kind, message = %info.message, "Inventory operation failed");
        self.state.write().last_error = Some(info.clone());
        self.emit(InventoryEvent::Failed(info));
        err
    }

    fn emit(&self, event: InventoryEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn inconsistent(card: &Card) -> InventoryError {
    InventoryError::Remote(ClientError::InvalidResponse(format!(
        "card {} reports {} of {} copies checked out",
        card.id, card.checked_out_quantity, card.total_quantity
    )))
}

/// Holds `loading` true for its lifetime
///
/// Dropped on success, error, cancellation and unwind alike.
struct LoadingGuard<'a> {
    store: &'a InventoryStore,
}

impl<'a> LoadingGuard<'a> {
    fn begin(store: &'a InventoryStore) -> Self {
        let started = {
            let mut state = store.state.write();
            state.pending += 1;
            state.last_error = None;
            state.pending == 1
        };
        if started {
            store.emit(InventoryEvent::Loading(true));
        }
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let finished = {
            let mut state = self.store.state.write();
            state.pending = state.pending.saturating_sub(1);
            state.pending == 0
        };
        if finished {
            self.store.emit(InventoryEvent::Loading(false));
        }
    }
}
