//! Backend service handlers for frontend-driven requests.
//!
//! This module groups async request handlers that operate on the shared
//! `AppContext`, call the classification server, and emit responses or
//! notifications back to the frontend. Handlers read what they need from the
//! state and run the network part in a spawned task, so a slow endpoint never
//! holds up the dispatch loop.

pub mod classify_service;
pub mod config_service;
pub mod files_service;
pub mod form_service;

use quarkfm_bridge::api::{ApiResult, FormOutcome};

use crate::remote::{RemoteActions, RemoteError, ReqwestTransport};

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::AppContext>;

/// Clones the server client out of the shared state.
async fn remote(context: &AppContextHandle) -> RemoteActions<ReqwestTransport> {
    context.state.read().await.remote.clone()
}

/// Flattens a call result into what the frontend shows to the user.
fn into_outcome(result: Result<ApiResult, RemoteError>) -> FormOutcome {
    result.map_err(|e| e.to_string())
}
