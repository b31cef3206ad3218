use quarkfm_bridge::{
    MessageFromBackend,
    api::FormOutcome,
    config::ServerConfig,
    notification::NotificationKind,
};
use tokio::sync::oneshot;

use crate::remote::{RemoteActions, ReqwestTransport};

/// Handles an incoming configuration request (see
/// [`quarkfm_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    let config = {
        let state = context.state.read().await;
        state.config.clone()
    };
    context
        .send(MessageFromBackend::ConfigurationResponse(config))
        .await;
}

/// Switches to another classification server and persists the address.
pub async fn handle_change_server_url(context: super::AppContextHandle, server_url: String) {
    let server_url = server_url.trim().to_owned();
    let config = {
        let mut state = context.state.write().await;
        let transport = match ReqwestTransport::new(state.request_client.clone(), &server_url) {
            Ok(transport) => transport,
            Err(e) => {
                drop(state);
                context
                    .send_notification(NotificationKind::Error, format!("Invalid server address: {e}"))
                    .await;
                return;
            }
        };

        log::info!("Switching classification server to {}", transport.base_url());
        state.remote = RemoteActions::new(transport);
        state.config.server_url = server_url.clone();
        state.config.clone()
    };

    if let Err(e) = crate::config::save_config(&config).await {
        log::error!("Failed to persist server URL: {e}");
    }

    context
        .send(MessageFromBackend::ConfigurationResponse(config))
        .await;
    context
        .send_notification(
            NotificationKind::Success,
            format!("Using server at {server_url}"),
        )
        .await;
}

/// Fetches the server's configuration document for the configuration page.
pub async fn handle_server_config_request(context: super::AppContextHandle) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        match remote.fetch_server_config().await {
            Ok(config) => {
                context
                    .send(MessageFromBackend::ServerConfigResponse(config))
                    .await
            }
            Err(e) => {
                log::warn!("Failed to fetch server config: {e}");
                context
                    .send_notification(
                        NotificationKind::Error,
                        format!("Failed to load configuration: {e}"),
                    )
                    .await
            }
        }
    });
}

/// Posts the configuration document and replies with the outcome.
pub async fn handle_save_server_config(
    context: super::AppContextHandle,
    config: ServerConfig,
    reply: oneshot::Sender<FormOutcome>,
) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        let outcome = super::into_outcome(remote.save_config(&config).await);
        if reply.send(outcome).is_err() {
            log::debug!("Save reply dropped, the requesting view is gone");
        }
    });
}
