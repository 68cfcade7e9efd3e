// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket endpoint and per-connection loop
//!
//! The credential is validated (and consumed) before the upgrade completes,
//! so a bad token is refused as a plain 401 and never becomes a socket. Once
//! open, a writer task pumps engine snapshots into the sink while the reader
//! loop feeds inbound frames to the engine and enforces the idle deadline.

use crate::app::ApiError;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use pantry_adapters::{CredentialStore, ItemStore, ListLock};
use pantry_core::{Clock, CloseReason, Credential, IdGen, SessionToken};
use pantry_engine::{ConnectError, SessionEngine};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}

/// `GET /shopping-list/modify?token=<opaque>`
pub async fn modify_list<C, S, L, K, I>(
    ws: WebSocketUpgrade,
    Query(params): Query<TokenParams>,
    State(engine): State<Arc<SessionEngine<C, S, L, K, I>>>,
) -> Response
where
    C: CredentialStore,
    S: ItemStore,
    L: ListLock,
    K: Clock,
    I: IdGen,
{
    let Some(raw) = params.token else {
        return ApiError::Unauthorized.into_response();
    };
    let token = SessionToken::new(raw);

    match engine.authorize(&token).await {
        Ok(credential) => {
            ws.on_upgrade(move |socket| serve_connection(engine, token, credential, socket))
        }
        Err(ConnectError::Rejected) => ApiError::Unauthorized.into_response(),
        Err(err) => ApiError::Internal(err.to_string()).into_response(),
    }
}

/// Drive one open connection until the client goes away or idles out
async fn serve_connection<C, S, L, K, I>(
    engine: Arc<SessionEngine<C, S, L, K, I>>,
    token: SessionToken,
    credential: Credential,
    socket: WebSocket,
) where
    C: CredentialStore,
    S: ItemStore,
    L: ListLock,
    K: Clock,
    I: IdGen,
{
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Writer task: ends when the engine unregisters the session and the
    // sender side drops.
    let writer = tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            let text = match serde_json::to_string(&snapshot) {
                Ok(text) => text,
                Err(err) => {
                    error!(%err, "failed to serialize snapshot");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let mut session = match engine.open(token, &credential, tx).await {
        Ok(session) => session,
        Err(err) => {
            error!(%err, "failed to open session");
            let _ = writer.await;
            return;
        }
    };

    let reason = loop {
        let deadline = match session.connection.idle_deadline() {
            Some(deadline) => deadline,
            None => break CloseReason::ClientGone,
        };

        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    session.record_activity(engine.now());
                    engine.handle_text(&session, text.as_str()).await;
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    session.record_activity(engine.now());
                }
                Some(Ok(Message::Binary(_))) => {
                    warn!(list = %session.list_id(), "ignoring binary frame");
                    session.record_activity(engine.now());
                }
                Some(Ok(Message::Close(_))) | None => break CloseReason::ClientGone,
                Some(Err(err)) => {
                    debug!(list = %session.list_id(), %err, "socket error");
                    break CloseReason::ClientGone;
                }
            },
            _ = tokio::time::sleep_until(deadline.into()) => {
                if session.connection.is_idle(engine.now()) {
                    break CloseReason::IdleTimeout;
                }
            }
        }
    };

    engine.close(&mut session, reason).await;
    let _ = writer.await;
}
