//! Operation Tracker - per-card, per-action in-progress flags
//!
//! Consulted before starting a save/delete/checkout/return so that duplicate
//! triggers (a double click, a repeated command) are dropped while a request
//! for the same `(card, action)` is outstanding.
//!
//! This only guards requests issued by this client. Other clients are
//! invisible here; the server remains the real concurrency guard.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared::models::CardId;

/// Per-card action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Save,
    Delete,
    Checkout,
    Return,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Save => "save",
            ActionKind::Delete => "delete",
            ActionKind::Checkout => "checkout",
            ActionKind::Return => "return",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-level flags not tied to a card id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalFlag {
    /// A list load is in flight
    ListLoading,
    /// A user-initiated list retry is in flight
    Retrying,
    /// A create submission is in flight
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlagKey {
    Action(CardId, ActionKind),
    Global(GlobalFlag),
}

/// In-progress flags keyed by `(card id, action)`
///
/// Records are created lazily and cleared to `false` on completion, never
/// removed.
#[derive(Debug, Default)]
pub struct OperationTracker {
    actions: DashMap<(CardId, ActionKind), bool>,
    globals: DashMap<GlobalFlag, bool>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set: `false` (and no change) if already in progress
    pub fn begin_action(&self, id: &CardId, kind: ActionKind) -> bool {
        let mut flag = self.actions.entry((id.clone(), kind)).or_insert(false);
        if *flag {
            tracing::debug!(card_id = %id, action = %kind, "Duplicate action suppressed");
            return false;
        }
        *flag = true;
        true
    }

    pub fn end_action(&self, id: &CardId, kind: ActionKind) {
        if let Some(mut flag) = self.actions.get_mut(&(id.clone(), kind)) {
            *flag = false;
        }
    }

    pub fn is_in_progress(&self, id: &CardId, kind: ActionKind) -> bool {
        self.actions
            .get(&(id.clone(), kind))
            .is_some_and(|flag| *flag)
    }

    /// Any card currently running `kind`
    pub fn is_kind_in_progress(&self, kind: ActionKind) -> bool {
        self.actions
            .iter()
            .any(|entry| entry.key().1 == kind && *entry.value())
    }

    pub fn begin_global(&self, flag: GlobalFlag) -> bool {
        let mut value = self.globals.entry(flag).or_insert(false);
        if *value {
            tracing::debug!(flag = ?flag, "Duplicate page action suppressed");
            return false;
        }
        *value = true;
        true
    }

    pub fn end_global(&self, flag: GlobalFlag) {
        if let Some(mut value) = self.globals.get_mut(&flag) {
            *value = false;
        }
    }

    pub fn is_global_in_progress(&self, flag: GlobalFlag) -> bool {
        self.globals.get(&flag).is_some_and(|value| *value)
    }

    /// OR of the page-level flags and every per-card flag
    pub fn any_action_in_progress(&self) -> bool {
        self.globals.iter().any(|entry| *entry.value())
            || self.actions.iter().any(|entry| *entry.value())
    }

    /// [`begin_action`](Self::begin_action) returning a guard that ends the
    /// action when dropped
    pub fn try_begin(&self, id: &CardId, kind: ActionKind) -> Option<ActionGuard<'_>> {
        self.begin_action(id, kind).then(|| ActionGuard {
            tracker: self,
            key: FlagKey::Action(id.clone(), kind),
        })
    }

    /// [`begin_global`](Self::begin_global) returning a guard
    pub fn try_begin_global(&self, flag: GlobalFlag) -> Option<ActionGuard<'_>> {
        self.begin_global(flag).then(|| ActionGuard {
            tracker: self,
            key: FlagKey::Global(flag),
        })
    }
}

/// Clears its flag on drop, on every exit path
#[derive(Debug)]
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct ActionGuard<'a> {
    tracker: &'a OperationTracker,
    key: FlagKey,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        match &self.key {
            FlagKey::Action(id, kind) => self.tracker.end_action(id, *kind),
            FlagKey::Global(flag) => self.tracker.end_global(*flag),
        }
    }
}
