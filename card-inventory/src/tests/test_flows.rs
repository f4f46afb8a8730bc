use super::*;

// ========================================================================
// Lifecycle flows
// ========================================================================

/// create -> checkout the only copy -> concurrent duplicate suppressed
#[tokio::test]
async fn test_single_copy_lifecycle() {
    let (inventory, fake) = create_inventory(vec![]);

    let created = inventory
        .create(&CardPayload::new("Charizard", 1))
        .await
        .unwrap()
        .completed()
        .unwrap();
    assert_eq!(created.id, CardId::new("c1"));
    assert_eq!(created.checked_out_quantity, 0);

    let cards = inventory.cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, CardId::new("c1"));

    fake.set_yield(true);
    let id = CardId::new("c1");
    let (first, second) = tokio::join!(
        inventory.checkout(&id, Confirmation::Confirmed),
        inventory.checkout(&id, Confirmation::Confirmed),
    );

    let card = first.unwrap().completed().unwrap();
    assert_eq!(card.checked_out_quantity, 1);
    assert!(card.is_out_of_stock());
    assert!(second.unwrap().is_suppressed());
    assert_eq!(fake.calls(RemoteOp::Checkout), 1);

    assert!(inventory.store().find(&id).unwrap().is_out_of_stock());
    assert!(!inventory.is_in_progress(&id, ActionKind::Checkout));
    assert!(!inventory.loading());
    assert_consistent(&inventory);
}

#[tokio::test]
async fn test_checkout_then_return_round_trip() {
    let (inventory, _fake) = loaded_inventory(vec![Card::new("a", "Pikachu", 2)]).await;
    let id = CardId::new("a");

    let card = inventory
        .checkout(&id, Confirmation::Unconfirmed)
        .await
        .unwrap()
        .completed()
        .unwrap();
    assert_eq!(card.checked_out_quantity, 1);
    assert!(crate::is_low_stock(&card));

    let card = inventory.return_card(&id).await.unwrap().completed().unwrap();
    assert_eq!(card.checked_out_quantity, 0);
    assert_eq!(inventory.cards(), vec![card]);
}

#[tokio::test]
async fn test_last_copy_needs_confirmation() {
    let (inventory, fake) =
        loaded_inventory(vec![Card::new("a", "Gyarados", 3).with_checked_out(2)]).await;
    let id = CardId::new("a");

    let outcome = inventory.checkout(&id, Confirmation::Unconfirmed).await.unwrap();
    assert_eq!(outcome, ActionOutcome::NeedsConfirmation);
    assert_eq!(fake.calls(RemoteOp::Checkout), 0);
    assert!(!inventory.is_in_progress(&id, ActionKind::Checkout));

    let card = inventory
        .checkout(&id, Confirmation::Confirmed)
        .await
        .unwrap()
        .completed()
        .unwrap();
    assert!(card.is_out_of_stock());
    assert_eq!(fake.calls(RemoteOp::Checkout), 1);
}

#[tokio::test]
async fn test_update_replaces_in_place() {
    let (inventory, _fake) = loaded_inventory(vec![
        Card::new("a", "Bulbasaur", 1),
        Card::new("b", "Ivysaur", 1),
    ])
    .await;
    let id = CardId::new("a");

    let mut payload = CardPayload::from_card(&inventory.store().find(&id).unwrap());
    payload.name = "Venusaur".into();
    payload.total_quantity = 4;
    inventory.update(&id, &payload).await.unwrap();

    let names: Vec<_> = inventory.cards().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Venusaur", "Ivysaur"]);
    assert_eq!(inventory.store().find(&id).unwrap().total_quantity, 4);
}

#[tokio::test]
async fn test_delete_removes_and_repeats_quietly() {
    let (inventory, fake) = loaded_inventory(vec![Card::new("a", "Magikarp", 9)]).await;
    let id = CardId::new("a");

    inventory.delete(&id).await.unwrap();
    assert!(inventory.cards().is_empty());
    inventory.delete(&id).await.unwrap();
    assert!(inventory.cards().is_empty());
    assert!(inventory.last_error().is_none());
    assert_eq!(fake.calls(RemoteOp::Delete), 2);
}

#[tokio::test]
async fn test_dispatch_routes_commands() {
    let (inventory, _fake) = create_inventory(vec![Card::new("a", "Jigglypuff", 2)]);

    let outcome = inventory.dispatch(InventoryCommand::List).await.unwrap();
    assert!(matches!(outcome, ActionOutcome::Completed(crate::CommandOutput::Cards(ref c)) if c.len() == 1));

    let outcome = inventory
        .dispatch(InventoryCommand::Checkout(CardId::new("a"), Confirmation::Unconfirmed))
        .await
        .unwrap();
    assert!(matches!(outcome, ActionOutcome::Completed(crate::CommandOutput::Card(ref c)) if c.checked_out_quantity == 1));

    let outcome = inventory
        .dispatch(InventoryCommand::Refresh(CardId::new("a")))
        .await
        .unwrap();
    assert!(matches!(outcome, ActionOutcome::Completed(crate::CommandOutput::Card(_))));
    assert_eq!(inventory.store().current().unwrap().id, CardId::new("a"));

    let outcome = inventory
        .dispatch(InventoryCommand::Delete(CardId::new("a")))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ActionOutcome::Completed(crate::CommandOutput::Deleted(CardId::new("a")))
    );
    assert!(inventory.store().current().is_none());
}
