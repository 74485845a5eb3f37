#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Proxima AI gateway
//!
//! Wraps the single multiplexed `POST /v1/chat/completions` endpoint, plus
//! the models, functions, stats and conversation endpoints, with bounded
//! retry on transient transport failures

mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod params;
pub mod response;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod types;

pub use client::ProximaClient;
pub use config::{CallPolicy, ClientConfig};
pub use dispatcher::RequestDispatcher;
pub use error::{ProximaError, Result};
pub use params::{ChatParams, RequestBody};
pub use response::ProximaResponse;
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportFailure};
pub use types::{CodeAction, Function};
