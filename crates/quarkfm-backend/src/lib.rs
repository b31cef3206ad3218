//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle, routes bridge messages to services,
//! and manages the shared state and the HTTP client used by asynchronous
//! tasks.

mod app;
mod config;
mod remote;
mod runtime;
mod services;
mod state;

pub(crate) use crate::app::AppContext;
pub use crate::remote::{ApiRequest, HttpTransport, Payload, RemoteActions, RemoteError, ReqwestTransport};
pub use crate::runtime::run;
