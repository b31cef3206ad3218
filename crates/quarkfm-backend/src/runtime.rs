//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, shared state, and the message
//! dispatch loop that listens to frontend bridge requests.

use std::{sync::Arc, thread};

use quarkfm_bridge::{
    MessageFromBackend, MessageToBackend,
    config::{ClientConfig, DEFAULT_SERVER_URL},
};
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::remote::{RemoteActions, RemoteError, ReqwestTransport};
use crate::state::State;

/// Builds the transport for the configured server, falling back to the
/// default address when the configured one does not parse.
fn build_transport(
    client: &reqwest::Client,
    config: &mut ClientConfig,
) -> Result<ReqwestTransport, RemoteError> {
    ReqwestTransport::new(client.clone(), &config.server_url).or_else(|e| {
        log::error!("Ignoring configured server URL: {e}");
        config.server_url = DEFAULT_SERVER_URL.to_owned();
        ReqwestTransport::new(client.clone(), DEFAULT_SERVER_URL)
    })
}

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> Result<(), RemoteError> {
    let mut config = match crate::config::load_config().await {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {e}");
            ClientConfig::default()
        }
    };

    let request_client = reqwest::Client::new();
    let transport = build_transport(&request_client, &mut config)?;
    log::info!("Using classification server at {}", transport.base_url());

    let state = Arc::new(RwLock::new(State {
        config,
        request_client,
        remote: RemoteActions::new(transport),
        watching_classification: false,
    }));

    let context = Arc::new(AppContext { state, tx });
    context.consume_bridge_messages(rx).await;
    Ok(())
}

/// Spawn the backend runtime and begin processing bridge messages.
pub fn run(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> std::io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("quarkfm-backend".to_owned())
        .spawn(move || {
            if let Err(e) = runtime.block_on(setup_backend(rx, tx)) {
                log::error!("Backend stopped: {e}");
            }
        })
}
