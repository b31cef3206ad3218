use quarkfm_bridge::{MessageFromBackend, notification::NotificationKind};
use tokio::sync::oneshot;

/// Handles an incoming browse request (see
/// [`quarkfm_bridge::MessageToBackend::BrowseFolderRequest`]). Always replies,
/// with an empty path when nothing was chosen.
pub async fn handle_browse_folder_request(
    context: super::AppContextHandle,
    reply: oneshot::Sender<String>,
) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        let path = remote.select_folder().await;
        if reply.send(path).is_err() {
            log::debug!("Browse reply dropped, the requesting view is gone");
        }
    });
}

/// Scans the server's source folder and pushes the summary to the frontend.
pub async fn handle_scan_files_request(context: super::AppContextHandle) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        match remote.scan_files().await {
            Ok(summary) => {
                let message = format!(
                    "Found {} files, {} batches to classify",
                    summary.count, summary.batches
                );
                context
                    .send(MessageFromBackend::ScanSummaryResponse(summary))
                    .await;
                context
                    .send_notification(NotificationKind::Info, message)
                    .await;
            }
            Err(e) => {
                context
                    .send_notification(NotificationKind::Error, format!("Scan failed: {e}"))
                    .await
            }
        }
    });
}
