//! In-memory [`CardStore`] for tests
//!
//! Behaves like the server: assigns ids, owns the authoritative quantities,
//! answers 409-style conflicts. Failures can be scripted per operation and
//! every call is counted.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use card_client::{CardStore, ClientError, ClientResult};
use parking_lot::Mutex;
use shared::models::{Card, CardId, CardPayload};

/// Remote operations, for scripting and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    Checkout,
    Return,
}

#[derive(Debug, Default)]
pub struct FakeCardStore {
    cards: Mutex<Vec<Card>>,
    failures: Mutex<HashMap<RemoteOp, VecDeque<ClientError>>>,
    calls: Mutex<HashMap<RemoteOp, usize>>,
    next_id: AtomicU64,
    yield_first: AtomicBool,
}

impl FakeCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server already holding `cards`
    pub fn with_cards(cards: Vec<Card>) -> Self {
        let store = Self::new();
        *store.cards.lock() = cards;
        store
    }

    /// Fail the next call of `op` with `err`
    pub fn fail_next(&self, op: RemoteOp, err: ClientError) {
        self.failures.lock().entry(op).or_default().push_back(err);
    }

    /// Suspend once inside every call, so concurrent callers interleave
    pub fn set_yield(&self, enabled: bool) {
        self.yield_first.store(enabled, Ordering::SeqCst);
    }

    pub fn calls(&self, op: RemoteOp) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// Server-side cards
    pub fn server_cards(&self) -> Vec<Card> {
        self.cards.lock().clone()
    }

    /// Change quantities behind the client's back (another client acting)
    pub fn set_checked_out(&self, id: &CardId, checked_out: u32) {
        if let Some(card) = self.cards.lock().iter_mut().find(|c| &c.id == id) {
            card.checked_out_quantity = checked_out;
        }
    }

    async fn enter(&self, op: RemoteOp) -> ClientResult<()> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        if self.yield_first.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        match self.failures.lock().get_mut(&op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn modify<F>(&self, id: &CardId, f: F) -> ClientResult<Card>
    where
        F: FnOnce(&mut Card) -> ClientResult<()>,
    {
        let mut cards = self.cards.lock();
        let card = cards
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("No card {id}")))?;
        f(&mut *card)?;
        Ok(card.clone())
    }
}

fn apply(card: &mut Card, payload: &CardPayload) {
    card.name = payload.name.clone();
    card.subject_name = payload.subject_name.clone();
    card.category = payload.category.clone();
    card.rarity = payload.rarity;
    card.length = payload.length.clone();
    card.weight = payload.weight.clone();
    card.card_number = payload.card_number.clone();
    card.description = payload.description.clone();
    card.total_quantity = payload.total_quantity;
    if let shared::models::ImageChange::Upload(image) = &payload.image {
        card.card_image = Some(format!("https://cdn.test/{}", image.file_name));
    }
}

#[async_trait]
impl CardStore for FakeCardStore {
    async fn list(&self) -> ClientResult<Vec<Card>> {
        self.enter(RemoteOp::List).await?;
        Ok(self.server_cards())
    }

    async fn get(&self, id: &CardId) -> ClientResult<Card> {
        self.enter(RemoteOp::Get).await?;
        self.modify(id, |_| Ok(()))
    }

    async fn create(&self, payload: &CardPayload) -> ClientResult<Card> {
        self.enter(RemoteOp::Create).await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut card = Card::new(format!("c{n}"), payload.name.clone(), payload.total_quantity);
        apply(&mut card, payload);
        self.cards.lock().push(card.clone());
        Ok(card)
    }

    async fn update(&self, id: &CardId, payload: &CardPayload) -> ClientResult<Card> {
        self.enter(RemoteOp::Update).await?;
        self.modify(id, |card| {
            if payload.total_quantity < card.checked_out_quantity {
                return Err(validation("total_quantity", "Total quantity too small"));
            }
            apply(card, payload);
            Ok(())
        })
    }

    async fn delete(&self, id: &CardId) -> ClientResult<()> {
        self.enter(RemoteOp::Delete).await?;
        self.cards.lock().retain(|c| &c.id != id);
        Ok(())
    }

    async fn checkout(&self, id: &CardId) -> ClientResult<Card> {
        self.enter(RemoteOp::Checkout).await?;
        self.modify(id, |card| {
            if card.is_out_of_stock() {
                return Err(ClientError::Conflict("No copies available for checkout".into()));
            }
            card.checked_out_quantity += 1;
            Ok(())
        })
    }

    async fn return_card(&self, id: &CardId) -> ClientResult<Card> {
        self.enter(RemoteOp::Return).await?;
        self.modify(id, |card| {
            if card.checked_out_quantity == 0 {
                return Err(ClientError::Conflict("No copies checked out".into()));
            }
            card.checked_out_quantity -= 1;
            Ok(())
        })
    }
}

fn validation(field: &str, message: &str) -> ClientError {
    ClientError::Validation {
        message: message.to_string(),
        field_errors: [(field.to_string(), message.to_string())].into_iter().collect(),
    }
}
