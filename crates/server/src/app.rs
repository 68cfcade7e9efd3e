// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: session issuance and the WebSocket route
//!
//! Ownership and sharing checks on the issuance route belong to the
//! upstream gateway; this surface refuses unknown lists and otherwise mints
//! a credential for the requested list.

use crate::ws;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pantry_adapters::{
    CredentialStore, ItemStore, ListLock, PgAdvisoryLock, PgItemStore, RedisCredentialStore,
};
use pantry_core::{Clock, IdGen, ListId, SystemClock, UuidIdGen};
use pantry_engine::{IssueError, SessionEngine};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// Engine with the production adapter stack
pub type ServerEngine =
    SessionEngine<RedisCredentialStore, PgItemStore, PgAdvisoryLock, SystemClock, UuidIdGen>;

pub type SharedEngine = Arc<ServerEngine>;

/// Build the router over any engine (tests use the fake adapter stack)
pub fn router<C, S, L, K, I>(engine: Arc<SessionEngine<C, S, L, K, I>>) -> Router
where
    C: CredentialStore,
    S: ItemStore,
    L: ListLock,
    K: Clock,
    I: IdGen,
{
    Router::new()
        .route(
            "/shopping-list/{id}/session",
            get(request_session::<C, S, L, K, I>),
        )
        .route("/shopping-list/modify", get(ws::modify_list::<C, S, L, K, I>))
        .with_state(engine)
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
}

/// `GET /shopping-list/{id}/session`
pub async fn request_session<C, S, L, K, I>(
    State(engine): State<Arc<SessionEngine<C, S, L, K, I>>>,
    Path(id): Path<i64>,
) -> Result<Json<SessionResponse>, ApiError>
where
    C: CredentialStore,
    S: ItemStore,
    L: ListLock,
    K: Clock,
    I: IdGen,
{
    let token = engine.issue_session(ListId(id)).await?;
    Ok(Json(SessionResponse {
        token: token.as_str().to_string(),
    }))
}

/// API-level errors with their HTTP mapping
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("invalid or expired session credential")]
    Unauthorized,
    #[error("internal error")]
    Internal(String),
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::UnknownList(id) => {
                ApiError::NotFound(format!("Shopping list {} not found", id))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "invalid or expired session credential".to_string(),
            ),
            ApiError::Internal(detail) => {
                error!(%detail, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error.".to_string())
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
