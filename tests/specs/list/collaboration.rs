//! Multi-connection collaboration specs

use crate::prelude::*;

fn text(action: &str, rest: &str) -> String {
    if rest.is_empty() {
        format!(r#"{{"action": "{}"}}"#, action)
    } else {
        format!(r#"{{"action": "{}", "item": {}}}"#, action, rest)
    }
}

#[tokio::test]
async fn one_mutation_reaches_every_attached_connection_identically() {
    let h = harness();
    let (session_a, mut rx_a) = connect(&h).await;
    let (_session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    h.engine
        .handle_text(&session_a, &text("add_item", r#"{"content": "eggs"}"#))
        .await;

    let to_a = rx_a.try_recv().unwrap();
    let to_b = rx_b.try_recv().unwrap();
    assert_eq!(to_a, to_b);
    assert_eq!(to_a.responding_to_action, "add_item");
    assert_eq!(to_a.items[0].content, "eggs");
}

#[tokio::test]
async fn a_full_editing_session_keeps_partitions_contiguous() {
    let h = harness();
    let (session, mut rx) = connect(&h).await;
    drain(&mut rx);

    let frames = [
        text("add_item", r#"{"content": "eggs"}"#),
        text("add_item", r#"{"content": "milk"}"#),
        text("add_item", r#"{"content": "flour"}"#),
        text("mark_item_complete", r#"{"id": "item-2"}"#),
        text("set_item_order", r#"{"id": "item-3", "order": 1}"#),
        text("set_item_content", r#"{"id": "item-1", "content": "duck eggs"}"#),
        text("set_item_notes", r#"{"id": "item-3", "notes": "buy 00"}"#),
        text("mark_item_incomplete", r#"{"id": "item-2"}"#),
        text("delete_item", r#"{"id": "item-1"}"#),
    ];

    for frame in &frames {
        h.engine.handle_text(&session, frame).await;
    }

    let snapshots = drain(&mut rx);
    assert_eq!(snapshots.len(), frames.len());
    for snapshot in &snapshots {
        assert_partitions(&snapshot.items);
    }

    let last = &snapshots[snapshots.len() - 1].items;
    assert_eq!(last.len(), 2);
    assert_eq!(last[0].content, "flour");
    assert_eq!(last[0].notes.as_deref(), Some("buy 00"));
    assert_eq!(last[1].content, "milk");
    assert_partitions(&h.items.stored(LIST));
}

#[tokio::test]
async fn completing_an_item_appends_it_to_the_done_partition() {
    let h = harness();
    h.items.seed(
        LIST,
        vec![
            item("a", false, 1),
            item("b", false, 2),
            item("c", true, 1),
            item("d", true, 2),
        ],
    );
    let (session, mut rx) = connect(&h).await;
    drain(&mut rx);

    h.engine
        .handle_text(&session, &text("mark_item_complete", r#"{"id": "a"}"#))
        .await;

    let snapshot = rx.try_recv().unwrap();
    assert_partitions(&snapshot.items);
    let moved = snapshot.items.iter().find(|i| i.id.as_str() == "a").unwrap();
    assert!(moved.completed);
    assert_eq!(moved.order, 3);
}

#[tokio::test]
async fn concurrent_editors_observe_one_total_order() {
    let h = harness();
    let (session_a, mut rx_a) = connect(&h).await;
    let (session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    let engine_a = h.engine.clone();
    let writer_a = tokio::spawn(async move {
        for n in 0..10 {
            let frame = format!(r#"{{"action": "add_item", "item": {{"content": "a{}"}}}}"#, n);
            engine_a.handle_text(&session_a, &frame).await;
        }
        session_a
    });
    let engine_b = h.engine.clone();
    let writer_b = tokio::spawn(async move {
        for n in 0..10 {
            let frame = format!(r#"{{"action": "add_item", "item": {{"content": "b{}"}}}}"#, n);
            engine_b.handle_text(&session_b, &frame).await;
        }
        session_b
    });
    writer_a.await.unwrap();
    writer_b.await.unwrap();

    let seen_a = drain(&mut rx_a);
    let seen_b = drain(&mut rx_b);
    assert_eq!(seen_a.len(), 20);
    // every observer sees the same snapshots in the same order
    assert_eq!(seen_a, seen_b);
    // each snapshot grows the list by exactly one item
    for (n, snapshot) in seen_a.iter().enumerate() {
        assert_eq!(snapshot.items.len(), n + 1);
        assert_partitions(&snapshot.items);
    }
    assert_eq!(h.items.stored(LIST).len(), 20);
}

#[tokio::test]
async fn mutations_on_different_lists_are_independent() {
    let h = harness();
    let other = pantry_core::ListId(2);
    h.items.register_list(other);

    let (session_a, mut rx_a) = connect(&h).await;

    // connect to the other list
    let token = h.engine.issue_session(other).await.unwrap();
    let credential = h.engine.authorize(&token).await.unwrap();
    let (tx, mut rx_other) = tokio::sync::mpsc::unbounded_channel();
    let session_other = h.engine.open(token, &credential, tx).await.unwrap();
    drain(&mut rx_a);
    drain(&mut rx_other);

    h.engine
        .handle_text(&session_a, &text("add_item", r#"{"content": "eggs"}"#))
        .await;
    h.engine
        .handle_text(&session_other, &text("add_item", r#"{"content": "milk"}"#))
        .await;

    let to_a = drain(&mut rx_a);
    let to_other = drain(&mut rx_other);
    assert_eq!(to_a.len(), 1);
    assert_eq!(to_other.len(), 1);
    assert_eq!(to_a[0].items[0].content, "eggs");
    assert_eq!(to_other[0].items[0].content, "milk");
    assert_eq!(h.items.stored(LIST).len(), 1);
    assert_eq!(h.items.stored(other).len(), 1);
}

#[tokio::test]
async fn clear_items_resets_the_list_for_everyone() {
    let h = harness();
    h.items.seed(LIST, vec![item("a", false, 1), item("b", true, 1)]);
    let (session_a, mut rx_a) = connect(&h).await;
    let (_session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    h.engine
        .handle_text(&session_a, &text("clear_items", ""))
        .await;

    assert!(rx_a.try_recv().unwrap().items.is_empty());
    assert!(rx_b.try_recv().unwrap().items.is_empty());
    assert!(h.items.stored(LIST).is_empty());
}
