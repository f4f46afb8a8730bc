//! Inventory coordinator - UI-facing entry point
//!
//! Wraps the [`InventoryStore`] with the [`OperationTracker`] so duplicate
//! triggers are dropped before any remote call, and runs the checkout
//! workflow ahead of the store.

use std::sync::Arc;

use card_client::CardStore;
use shared::error::ErrorInfo;
use shared::models::{Card, CardId, CardPayload};
use tokio::sync::broadcast;

use crate::error::{InventoryError, InventoryResult};
use crate::events::InventoryEvent;
use crate::store::InventoryStore;
use crate::tracker::{ActionKind, GlobalFlag, OperationTracker};
use crate::workflow::{CheckoutPlan, Confirmation, plan_checkout};

/// Result of a user action that may be dropped or deferred
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome<T> {
    Completed(T),
    /// Same action already in flight; nothing was sent
    Suppressed,
    /// Last copy; re-issue with [`Confirmation::Confirmed`]
    NeedsConfirmation,
}

impl<T> ActionOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionOutcome<U> {
        match self {
            ActionOutcome::Completed(value) => ActionOutcome::Completed(f(value)),
            ActionOutcome::Suppressed => ActionOutcome::Suppressed,
            ActionOutcome::NeedsConfirmation => ActionOutcome::NeedsConfirmation,
        }
    }

    pub fn completed(self) -> Option<T> {
        match self {
            ActionOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, ActionOutcome::Suppressed)
    }
}

/// User intents, one per store operation
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryCommand {
    List,
    RetryList,
    Refresh(CardId),
    Create(CardPayload),
    Update(CardId, CardPayload),
    Delete(CardId),
    Checkout(CardId, Confirmation),
    Return(CardId),
}

impl InventoryCommand {
    pub fn name(&self) -> &'static str {
        match self {
            InventoryCommand::List => "list",
            InventoryCommand::RetryList => "retry_list",
            InventoryCommand::Refresh(_) => "refresh",
            InventoryCommand::Create(_) => "create",
            InventoryCommand::Update(..) => "update",
            InventoryCommand::Delete(_) => "delete",
            InventoryCommand::Checkout(..) => "checkout",
            InventoryCommand::Return(_) => "return",
        }
    }
}

/// What a dispatched command produced
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Cards(Vec<Card>),
    Card(Card),
    Deleted(CardId),
}

#[derive(Debug)]
pub struct Inventory {
    store: InventoryStore,
    tracker: OperationTracker,
}

impl Inventory {
    pub fn new(remote: Arc<dyn CardStore>) -> Self {
        Self {
            store: InventoryStore::new(remote),
            tracker: OperationTracker::new(),
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn tracker(&self) -> &OperationTracker {
        &self.tracker
    }

    // ========== Rendering state ==========

    pub fn cards(&self) -> Vec<Card> {
        self.store.cards()
    }

    pub fn loading(&self) -> bool {
        self.store.loading()
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.store.last_error()
    }

    pub fn is_in_progress(&self, id: &CardId, kind: ActionKind) -> bool {
        self.tracker.is_in_progress(id, kind)
    }

    pub fn any_action_in_progress(&self) -> bool {
        self.tracker.any_action_in_progress()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.store.subscribe()
    }

    // ========== Actions ==========

    pub async fn load(&self) -> InventoryResult<ActionOutcome<Vec<Card>>> {
        let Some(_guard) = self.tracker.try_begin_global(GlobalFlag::ListLoading) else {
            return Ok(ActionOutcome::Suppressed);
        };
        self.store.load().await.map(ActionOutcome::Completed)
    }

    /// Manual retry after a failed load
    ///
    /// One attempt per call. Suppressed while a load or another retry runs.
    pub async fn retry_load(&self) -> InventoryResult<ActionOutcome<Vec<Card>>> {
        let Some(_retrying) = self.tracker.try_begin_global(GlobalFlag::Retrying) else {
            return Ok(ActionOutcome::Suppressed);
        };
        tracing::info!("Retrying inventory load");
        self.load().await
    }

    pub async fn refresh_card(&self, id: &CardId) -> InventoryResult<Card> {
        self.store.fetch_card(id).await
    }

    pub async fn create(&self, payload: &CardPayload) -> InventoryResult<ActionOutcome<Card>> {
        let Some(_guard) = self.tracker.try_begin_global(GlobalFlag::Submit) else {
            return Ok(ActionOutcome::Suppressed);
        };
        self.store.create(payload).await.map(ActionOutcome::Completed)
    }

    pub async fn update(
        &self,
        id: &CardId,
        payload: &CardPayload,
    ) -> InventoryResult<ActionOutcome<Card>> {
        let Some(_guard) = self.tracker.try_begin(id, ActionKind::Save) else {
            return Ok(ActionOutcome::Suppressed);
        };
        self.store.update(id, payload).await.map(ActionOutcome::Completed)
    }

    pub async fn delete(&self, id: &CardId) -> InventoryResult<ActionOutcome<()>> {
        let Some(_guard) = self.tracker.try_begin(id, ActionKind::Delete) else {
            return Ok(ActionOutcome::Suppressed);
        };
        self.store.delete(id).await.map(ActionOutcome::Completed)
    }

    /// Check out one copy, asking for confirmation on the last one
    pub async fn checkout(
        &self,
        id: &CardId,
        confirmation: Confirmation,
    ) -> InventoryResult<ActionOutcome<Card>> {
        let Some(_guard) = self.tracker.try_begin(id, ActionKind::Checkout) else {
            return Ok(ActionOutcome::Suppressed);
        };
        let card = self.known_card(id)?;

        match plan_checkout(&card) {
            CheckoutPlan::ConfirmLastCopy if !confirmation.is_confirmed() => {
                tracing::debug!(card_id = %id, "Last copy, awaiting confirmation");
                Ok(ActionOutcome::NeedsConfirmation)
            }
            // Unavailable is refused by the store and recorded there
            _ => self.store.checkout(id).await.map(ActionOutcome::Completed),
        }
    }

    pub async fn return_card(&self, id: &CardId) -> InventoryResult<ActionOutcome<Card>> {
        let Some(_guard) = self.tracker.try_begin(id, ActionKind::Return) else {
            return Ok(ActionOutcome::Suppressed);
        };
        self.known_card(id)?;
        self.store.return_card(id).await.map(ActionOutcome::Completed)
    }

    /// Route a command to its action
    pub async fn dispatch(
        &self,
        command: InventoryCommand,
    ) -> InventoryResult<ActionOutcome<CommandOutput>> {
        tracing::debug!(command = command.name(), "Dispatching inventory command");
        match command {
            InventoryCommand::List => Ok(self.load().await?.map(CommandOutput::Cards)),
            InventoryCommand::RetryList => Ok(self.retry_load().await?.map(CommandOutput::Cards)),
            InventoryCommand::Refresh(id) => Ok(ActionOutcome::Completed(CommandOutput::Card(
                self.refresh_card(&id).await?,
            ))),
            InventoryCommand::Create(payload) => {
                Ok(self.create(&payload).await?.map(CommandOutput::Card))
            }
            InventoryCommand::Update(id, payload) => {
                Ok(self.update(&id, &payload).await?.map(CommandOutput::Card))
            }
            InventoryCommand::Delete(id) => Ok(self
                .delete(&id)
                .await?
                .map(|()| CommandOutput::Deleted(id))),
            InventoryCommand::Checkout(id, confirmation) => Ok(self
                .checkout(&id, confirmation)
                .await?
                .map(CommandOutput::Card)),
            InventoryCommand::Return(id) => {
                Ok(self.return_card(&id).await?.map(CommandOutput::Card))
            }
        }
    }

    /// Checkout and return act on a card the user can see
    fn known_card(&self, id: &CardId) -> InventoryResult<Card> {
        self.store
            .find(id)
            .ok_or_else(|| self.store.fail(InventoryError::UnknownCard(id.clone())))
    }
}
