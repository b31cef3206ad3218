use quarkfm_bridge::config::ClientConfig;

use crate::remote::{RemoteActions, ReqwestTransport};

/// The core application state that holds configuration, the server client,
/// and other shared resources.
///
/// It is designed to be wrapped in thread-safe, async-friendly concurrency
/// primitives (see [`SharedState`]) to allow safe concurrent reads and
/// occasional writes from multiple tasks.
#[derive(Debug, Clone)]
pub struct State {
    /// The loaded client configuration.
    pub config: ClientConfig,
    /// Shared HTTP client for making efficient, pooled requests.
    pub request_client: reqwest::Client,
    /// Typed calls to the classification server at `config.server_url`.
    pub remote: RemoteActions<ReqwestTransport>,
    /// Whether a task is already following classification progress.
    pub watching_classification: bool,
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
///
/// This is the recommended way to pass state into async handlers, background
/// tasks, or any context where multiple tasks need read access (and occasional
/// write access).
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
