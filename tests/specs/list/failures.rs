//! Degradation specs: nothing crashes, ordering never corrupts

use crate::prelude::*;

#[tokio::test]
async fn persistence_failure_leaves_every_observer_consistent() {
    let h = harness();
    h.items.seed(LIST, vec![item("a", false, 1)]);
    let (session_a, mut rx_a) = connect(&h).await;
    let (_session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    h.items.fail_next_apply();
    h.engine
        .handle_text(
            &session_a,
            r#"{"action": "add_item", "item": {"content": "eggs"}}"#,
        )
        .await;

    // the sender resyncs from the unchanged state; nobody else hears a thing
    let to_sender = rx_a.try_recv().unwrap();
    assert_eq!(to_sender.responding_to_action, "add_item");
    assert_eq!(to_sender.items, vec![item("a", false, 1)]);
    assert!(rx_b.try_recv().is_err());
    assert_eq!(h.items.stored(LIST), vec![item("a", false, 1)]);
    assert_partitions(&h.items.stored(LIST));
}

#[tokio::test]
async fn garbage_frames_never_interrupt_the_session() {
    let h = harness();
    let (session, mut rx) = connect(&h).await;
    drain(&mut rx);

    for frame in [
        "",
        "garbage",
        r#"{"action": 7}"#,
        r#"{"action": "definitely_not_real"}"#,
        r#"{"action": "add_item"}"#,
        r#"{"action": "set_item_order", "item": {"id": "a"}}"#,
    ] {
        h.engine.handle_text(&session, frame).await;
    }
    assert!(rx.try_recv().is_err());

    // the connection is still serviceable afterwards
    h.engine
        .handle_text(
            &session,
            r#"{"action": "add_item", "item": {"content": "eggs"}}"#,
        )
        .await;
    assert_eq!(rx.try_recv().unwrap().items.len(), 1);
}

#[tokio::test]
async fn stale_references_resolve_to_the_current_state() {
    let h = harness();
    h.items.seed(LIST, vec![item("a", false, 1)]);
    let (session_a, mut rx_a) = connect(&h).await;
    let (session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    // A deletes the item; B edits it a beat later
    h.engine
        .handle_text(&session_a, r#"{"action": "delete_item", "item": {"id": "a"}}"#)
        .await;
    h.engine
        .handle_text(
            &session_b,
            r#"{"action": "set_item_content", "item": {"id": "a", "content": "almonds"}}"#,
        )
        .await;

    let seen_a = drain(&mut rx_a);
    let seen_b = drain(&mut rx_b);
    assert_eq!(seen_a, seen_b);
    assert_eq!(seen_a.len(), 2);
    // B's edit of the deleted item is a broadcast no-op
    assert_eq!(seen_a[1].responding_to_action, "set_item_content");
    assert!(seen_a[1].items.is_empty());
}

#[tokio::test]
async fn pings_keep_flowing_during_collaboration() {
    let h = harness();
    let (session_a, mut rx_a) = connect(&h).await;
    let (_session_b, mut rx_b) = connect(&h).await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    h.engine
        .handle_text(&session_a, r#"{"action": "__ping__"}"#)
        .await;

    let ack = rx_a.try_recv().unwrap();
    assert_eq!(ack.responding_to_action, "__ping__");
    assert!(ack.items.is_empty());
    assert!(rx_b.try_recv().is_err());
}
