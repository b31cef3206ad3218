use std::time::Duration;

use quarkfm_bridge::{
    MessageFromBackend,
    classification::ClassificationPhase,
    notification::{NotificationKind, NotificationMessage},
};
use tokio::sync::mpsc::Sender;

use crate::remote::{HttpTransport, RemoteActions};

/// Delay between two status polls of a running classification.
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Starts following the progress of a classification (see
/// [`quarkfm_bridge::MessageToBackend::WatchClassificationRequest`]). Only one
/// watcher runs at a time.
pub async fn handle_watch_classification_request(context: super::AppContextHandle) {
    let remote = {
        let mut state = context.state.write().await;
        if state.watching_classification {
            log::debug!("Classification is already being watched");
            return;
        }
        state.watching_classification = true;
        state.remote.clone()
    };

    tokio::spawn(async move {
        let verdict = watch_status(&remote, &context.tx, STATUS_POLL_INTERVAL).await;
        context.state.write().await.watching_classification = false;
        if let Some(notification) = verdict {
            context
                .send(MessageFromBackend::NotificationMessage(notification))
                .await;
        }
    });
}

/// Polls the status endpoint and forwards every snapshot until the run leaves
/// the processing phase. Returns the notification describing how it ended, if
/// any. A failed poll ends the watch.
pub(crate) async fn watch_status<T: HttpTransport>(
    remote: &RemoteActions<T>,
    tx: &Sender<MessageFromBackend>,
    interval: Duration,
) -> Option<NotificationMessage> {
    loop {
        tokio::time::sleep(interval).await;

        let status = match remote.classification_status().await {
            Ok(status) => status,
            Err(e) => {
                log::warn!("Failed to poll classification status: {e}");
                return Some(NotificationMessage::error(format!(
                    "Lost track of the classification: {e}"
                )));
            }
        };

        let phase = status.status;
        log::debug!(
            "Classification {phase:?}: batch {}/{}, {}%",
            status.current_batch,
            status.total_batches,
            status.progress
        );
        if tx
            .send(MessageFromBackend::ClassificationStatusUpdate(status))
            .await
            .is_err()
        {
            return None;
        }

        match phase {
            ClassificationPhase::Processing => continue,
            ClassificationPhase::Completed => {
                return Some(NotificationMessage::success("Classification finished"));
            }
            ClassificationPhase::Error => {
                return Some(NotificationMessage::error("Classification failed on the server"));
            }
            ClassificationPhase::Idle | ClassificationPhase::Unknown => return None,
        }
    }
}

/// Fetches the results of the last run for the results page.
pub async fn handle_results_request(context: super::AppContextHandle) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        match remote.classification_results().await {
            Ok(results) => {
                context
                    .send(MessageFromBackend::ClassificationResultsResponse(results))
                    .await
            }
            Err(e) => {
                context
                    .send_notification(NotificationKind::Error, format!("No results yet: {e}"))
                    .await
            }
        }
    });
}

/// Moves one file to another category on the server. Only failures are
/// reported, the frontend has already applied the change locally.
pub async fn handle_adjust_request(
    context: super::AppContextHandle,
    file_id: u32,
    category_index: usize,
) {
    let remote = super::remote(&context).await;
    tokio::spawn(async move {
        let failure = match remote.adjust_classification(file_id, category_index).await {
            Ok(result) if result.success => None,
            Ok(result) => Some(result.message().unwrap_or("Adjustment rejected").to_owned()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = failure {
            context
                .send_notification(
                    NotificationKind::Error,
                    format!("Failed to change category: {reason}"),
                )
                .await;
        }
    });
}

#[cfg(test)]
mod tests {
    use quarkfm_bridge::notification::NotificationKind;
    use serde_json::json;
    use tokio::sync::mpsc;

    use super::*;
    use crate::remote::tests::FakeTransport;

    const STATUS: &str = "/api/classify/status";

    fn status(phase: &str, progress: u8) -> serde_json::Value {
        json!({
            "status": phase,
            "progress": progress,
            "current_batch": 1,
            "total_batches": 2,
            "current_file": ""
        })
    }

    fn drain(rx: &mut mpsc::Receiver<MessageFromBackend>) -> Vec<u8> {
        let mut progress = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let MessageFromBackend::ClassificationStatusUpdate(status) = message {
                progress.push(status.progress);
            }
        }
        progress
    }

    #[tokio::test(start_paused = true)]
    async fn watch_forwards_progress_until_completion() {
        let remote = RemoteActions::new(
            FakeTransport::default()
                .respond(STATUS, status("processing", 30))
                .respond(STATUS, status("processing", 60))
                .respond(STATUS, status("completed", 100)),
        );
        let (tx, mut rx) = mpsc::channel(16);

        let verdict = watch_status(&remote, &tx, STATUS_POLL_INTERVAL).await.unwrap();
        assert_eq!(verdict.kind, NotificationKind::Success);
        assert_eq!(drain(&mut rx), vec![30, 60, 100]);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_reports_server_errors() {
        let remote = RemoteActions::new(FakeTransport::default().respond(STATUS, status("error", 10)));
        let (tx, _rx) = mpsc::channel(16);

        let verdict = watch_status(&remote, &tx, STATUS_POLL_INTERVAL).await.unwrap();
        assert_eq!(verdict.kind, NotificationKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_stops_after_a_failed_poll() {
        let remote = RemoteActions::new(FakeTransport::default().fail(STATUS, "connection reset"));
        let (tx, mut rx) = mpsc::channel(16);

        let verdict = watch_status(&remote, &tx, STATUS_POLL_INTERVAL).await.unwrap();
        assert_eq!(verdict.kind, NotificationKind::Error);
        assert!(verdict.message.contains("connection reset"));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(remote.transport().sent().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_server_ends_the_watch_quietly() {
        let remote = RemoteActions::new(FakeTransport::default().respond(STATUS, status("idle", 0)));
        let (tx, _rx) = mpsc::channel(16);

        assert!(watch_status(&remote, &tx, STATUS_POLL_INTERVAL).await.is_none());
    }
}
