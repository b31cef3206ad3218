//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and notifications back to the frontend bridge.

use std::sync::Arc;

use quarkfm_bridge::{
    MessageFromBackend, MessageToBackend,
    notification::{NotificationKind, NotificationMessage},
};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::info!("Frontend bridge closed, stopping backend");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToBackend::ChangeServerUrlRequest(server_url) => {
                services::config_service::handle_change_server_url(self.clone(), server_url).await;
            }
            MessageToBackend::ServerConfigRequest => {
                services::config_service::handle_server_config_request(self.clone()).await;
            }
            MessageToBackend::SaveServerConfigRequest { config, reply } => {
                services::config_service::handle_save_server_config(self.clone(), config, reply)
                    .await;
            }
            MessageToBackend::BrowseFolderRequest(reply) => {
                services::files_service::handle_browse_folder_request(self.clone(), reply).await;
            }
            MessageToBackend::ScanFilesRequest => {
                services::files_service::handle_scan_files_request(self.clone()).await;
            }
            MessageToBackend::SubmitFormRequest { request, reply } => {
                services::form_service::handle_submit_form_request(self.clone(), request, reply)
                    .await;
            }
            MessageToBackend::WatchClassificationRequest => {
                services::classify_service::handle_watch_classification_request(self.clone())
                    .await;
            }
            MessageToBackend::ClassificationResultsRequest => {
                services::classify_service::handle_results_request(self.clone()).await;
            }
            MessageToBackend::AdjustClassificationRequest {
                file_id,
                category_index,
            } => {
                services::classify_service::handle_adjust_request(
                    self.clone(),
                    file_id,
                    category_index,
                )
                .await;
            }
        }
    }

    /// Send a message to the frontend bridge. A closed bridge means the window
    /// is gone, so the message is dropped.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(e) = self.tx.send(message).await {
            log::warn!("Dropping message for closed frontend: {:?}", e.0);
        }
    }

    /// Send a notification message to the frontend bridge.
    pub async fn send_notification(&self, kind: NotificationKind, content: impl Into<String>) {
        self.send(MessageFromBackend::NotificationMessage(
            NotificationMessage::new(kind, content),
        ))
        .await;
    }
}
