//! Session issuance and handshake specs

use crate::prelude::*;
use pantry_adapters::CredentialStore;
use pantry_core::{CloseReason, SessionToken};
use pantry_engine::{ConnectError, IssueError};

#[tokio::test]
async fn issued_token_opens_exactly_one_session() {
    let h = harness();

    let token = h.engine.issue_session(LIST).await.unwrap();
    let credential = h.engine.authorize(&token).await.unwrap();
    assert_eq!(credential.entity.id, LIST);

    // the credential was consumed by the first handshake
    let err = h.engine.authorize(&token).await.unwrap_err();
    assert!(matches!(err, ConnectError::Rejected));
}

#[tokio::test]
async fn unknown_list_yields_no_credential() {
    let h = harness();
    let err = h.engine.issue_session(pantry_core::ListId(99)).await.unwrap_err();
    assert!(matches!(err, IssueError::UnknownList(_)));
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let h = harness();
    let err = h
        .engine
        .authorize(&SessionToken::new("not-a-real-token"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::Rejected));
}

#[tokio::test]
async fn opening_attaches_and_delivers_initial_state() {
    let h = harness();
    h.items.seed(LIST, vec![item("a", false, 1), item("b", true, 1)]);

    let (session, mut rx) = connect(&h).await;
    assert!(session.connection.is_open());
    assert!(h.credentials.is_attached(session.entity(), session.token()));

    let initial = rx.try_recv().unwrap();
    assert_eq!(initial.responding_to_action, "current_items");
    assert_eq!(initial.items.len(), 2);
    assert_partitions(&initial.items);
}

#[tokio::test]
async fn closing_detaches_the_session() {
    let h = harness();
    let (mut session, _rx) = connect(&h).await;

    h.engine.close(&mut session, CloseReason::ClientGone).await;

    assert!(!session.connection.is_open());
    assert!(!h.credentials.is_attached(session.entity(), session.token()));
    assert!(h
        .credentials
        .active_tokens(session.entity())
        .await
        .unwrap()
        .is_empty());
}
