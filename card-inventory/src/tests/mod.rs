use std::sync::Arc;

use card_client::ClientError;
use shared::error::ErrorKind;
use shared::models::{Card, CardId, CardPayload};

use crate::testing::{FakeCardStore, RemoteOp};
use crate::{ActionKind, ActionOutcome, Confirmation, Inventory, InventoryCommand};

fn create_inventory(cards: Vec<Card>) -> (Inventory, Arc<FakeCardStore>) {
    let fake = Arc::new(FakeCardStore::with_cards(cards));
    (Inventory::new(fake.clone()), fake)
}

async fn loaded_inventory(cards: Vec<Card>) -> (Inventory, Arc<FakeCardStore>) {
    let (inventory, fake) = create_inventory(cards);
    let outcome = inventory.load().await.unwrap();
    assert!(matches!(outcome, ActionOutcome::Completed(_)));
    (inventory, fake)
}

/// Snapshot never shows more copies checked out than exist
fn assert_consistent(inventory: &Inventory) {
    for card in inventory.cards() {
        assert!(
            card.checked_out_quantity <= card.total_quantity,
            "inconsistent card {}: {}/{}",
            card.id,
            card.checked_out_quantity,
            card.total_quantity
        );
    }
}

mod test_flows;
