use gpui::{AppContext, Application, Entity, TitlebarOptions, WindowOptions};
use gpui_component::Root;
use quarkfm_bridge::{
    MessageFromBackend, MessageToBackend,
    api::{FormOutcome, FormRequest},
    config::ServerConfig,
};
use tokio::sync::{mpsc, oneshot};

use crate::entities::{
    classification_entity::ClassificationEntity, navigation_entity::NavigationEntity,
    notification_entity::NotificationEntity, settings_entity::SettingsEntity,
};

pub mod components;
pub mod entities;
pub mod forms;
pub mod notifications;
pub mod routes;
mod views;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    async fn send(&self, message: MessageToBackend) -> bool {
        match self.to_backend.send(message).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Backend is not running, dropped {:?}", e.0);
                false
            }
        }
    }

    async fn request<R>(
        &self,
        message: impl FnOnce(oneshot::Sender<R>) -> MessageToBackend,
    ) -> Option<R> {
        let (reply, response) = oneshot::channel();
        if !self.send(message(reply)).await {
            return None;
        }
        response.await.ok()
    }

    pub async fn request_config(&self) {
        self.send(MessageToBackend::ConfigurationRequest).await;
    }

    pub async fn change_server_url(&self, server_url: String) {
        self.send(MessageToBackend::ChangeServerUrlRequest(server_url))
            .await;
    }

    pub async fn request_server_config(&self) {
        self.send(MessageToBackend::ServerConfigRequest).await;
    }

    /// Asks the server for a folder. Empty when nothing was chosen or the
    /// call failed.
    pub async fn select_folder(&self) -> String {
        self.request(MessageToBackend::BrowseFolderRequest)
            .await
            .unwrap_or_default()
    }

    pub async fn save_server_config(&self, config: ServerConfig) -> FormOutcome {
        self.request(|reply| MessageToBackend::SaveServerConfigRequest { config, reply })
            .await
            .unwrap_or_else(|| Err("backend is not running".to_owned()))
    }

    pub async fn submit_form(&self, request: FormRequest) -> FormOutcome {
        self.request(|reply| MessageToBackend::SubmitFormRequest { request, reply })
            .await
            .unwrap_or_else(|| Err("backend is not running".to_owned()))
    }

    pub async fn scan_files(&self) {
        self.send(MessageToBackend::ScanFilesRequest).await;
    }

    pub async fn watch_classification(&self) {
        self.send(MessageToBackend::WatchClassificationRequest)
            .await;
    }

    pub async fn request_results(&self) {
        self.send(MessageToBackend::ClassificationResultsRequest)
            .await;
    }

    pub async fn adjust_classification(&self, file_id: u32, category_index: usize) {
        self.send(MessageToBackend::AdjustClassificationRequest {
            file_id,
            category_index,
        })
        .await;
    }
}

/// Handles every page needs to talk to the backend and to the shell around
/// it.
#[derive(Clone)]
pub struct Services {
    pub bridge: BackendBridge,
    pub notifications: Entity<NotificationEntity>,
    pub navigation: Entity<NavigationEntity>,
}

pub fn run(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_component::init(cx);

        let data = entities::DataEntities {
            settings: cx.new(|_| SettingsEntity::default()),
            classification: cx.new(|_| ClassificationEntity::default()),
        };
        let services = Services {
            bridge: BackendBridge {
                to_backend: tx.clone(),
            },
            notifications: cx.new(|_| NotificationEntity::default()),
            navigation: cx.new(|_| NavigationEntity::new(data.settings.clone())),
        };

        let listener_data = data.clone();
        let notifications = services.notifications.clone();
        cx.spawn(async move |cx| {
            while let Some(message) = rx.recv().await {
                log::debug!("Got a message from backend: {message:?}");
                match message {
                    MessageFromBackend::NotificationMessage(notification) => {
                        let _ = notifications.update(cx, |this, cx| this.show(notification, cx));
                    }
                    MessageFromBackend::ConfigurationResponse(config) => {
                        SettingsEntity::update_client(&listener_data.settings, config, cx)
                    }
                    MessageFromBackend::ServerConfigResponse(config) => {
                        SettingsEntity::update_server(&listener_data.settings, config, cx)
                    }
                    MessageFromBackend::ScanSummaryResponse(summary) => {
                        let _ = listener_data
                            .classification
                            .update(cx, |this, cx| this.set_summary(summary, cx));
                    }
                    MessageFromBackend::ClassificationStatusUpdate(status) => {
                        let _ = listener_data
                            .classification
                            .update(cx, |this, cx| this.set_status(status, cx));
                    }
                    MessageFromBackend::ClassificationResultsResponse(results) => {
                        let _ = listener_data
                            .classification
                            .update(cx, |this, cx| this.set_results(results, cx));
                    }
                }
            }
            log::info!("Backend channel closed");
        })
        .detach();

        let bridge = services.bridge.clone();
        cx.spawn(async move |_| bridge.request_config().await)
            .detach();

        let window_options = WindowOptions {
            titlebar: Some(TitlebarOptions {
                title: Some("quarkfm".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        cx.spawn(async move |cx| {
            cx.open_window(window_options, |window, cx| {
                let view = cx.new(|cx| crate::views::FrontendUi::new(&services, &data, window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
