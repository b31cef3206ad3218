//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the graphical
//! frontend with the asynchronous backend that talks to the classification
//! server.
//!
//! The design is deliberately lightweight:
//! - The frontend sends commands (e.g., browse for a folder, save the server
//!   configuration, submit a form, scan files).
//! - The backend pushes events (e.g., notifications, classification progress,
//!   fetched documents).
//! - Commands whose result the caller waits for carry a
//!   [`tokio::sync::oneshot`] reply sender.
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod api;
pub mod classification;
pub mod config;
pub mod notification;

use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot;

/// Messages emitted by the backend to inform the frontend of state updates.
///
/// These are typically sent in response to frontend requests or to push
/// asynchronous progress/events (e.g., classification progress,
/// notifications).
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Generic message for all notifications in the application.
    NotificationMessage(notification::NotificationMessage),
    /// Response to the client configuration request from the frontend.
    ConfigurationResponse(config::ClientConfig),
    /// Configuration document fetched from the classification server.
    ServerConfigResponse(config::ServerConfig),
    /// Result of a file scan on the server.
    ScanSummaryResponse(classification::ScanSummary),
    /// Progress of a running classification, pushed until it finishes.
    ClassificationStatusUpdate(classification::ClassificationStatus),
    /// Files of the last classification run with their categories.
    ClassificationResultsResponse(classification::ClassificationResults),
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug)]
pub enum MessageToBackend {
    /// Request for the client configuration.
    ConfigurationRequest,
    /// Point the client at another classification server and remember it.
    ChangeServerUrlRequest(String),
    /// Request for the configuration document of the classification server.
    ServerConfigRequest,
    /// Ask the server for a folder. Replies with the chosen path, or an empty
    /// string when nothing was chosen or the call failed.
    BrowseFolderRequest(oneshot::Sender<String>),
    /// Save the configuration document on the server.
    SaveServerConfigRequest {
        config: config::ServerConfig,
        reply: oneshot::Sender<api::FormOutcome>,
    },
    /// Send a serialized form to its declared target.
    SubmitFormRequest {
        request: api::FormRequest,
        reply: oneshot::Sender<api::FormOutcome>,
    },
    /// Scan the server's source folder.
    ScanFilesRequest,
    /// Follow the progress of a classification that was just started.
    WatchClassificationRequest,
    /// Request the results of the last classification run.
    ClassificationResultsRequest,
    /// Move a single file to another category.
    AdjustClassificationRequest { file_id: u32, category_index: usize },
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
