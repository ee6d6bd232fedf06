//! Controller error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Split error: {0}")]
    Split(#[from] sol_core::Error),

    #[error("No topology edge between {from} and {to}")]
    MissingEdge { from: String, to: String },

    #[error("Path too short for rule synthesis: {hops} node(s)")]
    PathTooShort { hops: usize },

    #[error("Subflow is not IPv4: {src} -> {dst}")]
    NotIpv4 { src: String, dst: String },

    #[error("Flow id sequence exhausted")]
    FlowIdsExhausted,

    #[error("Controller rejected flow {flow_id} on {device}: status {status}: {body}")]
    Rejected {
        device: String,
        flow_id: u64,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
