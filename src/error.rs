// src/error.rs

use thiserror::Error;

/// Errors reported by a realtime channel.
///
/// These never reach the UI; the adapter only logs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel '{0}' has been shut down")]
    HubClosed(String),
    #[error("client is not connected")]
    NotConnected,
    #[error("client is already connected")]
    AlreadyConnected,
    #[error("client is not subscribed to room '{0}'")]
    NotSubscribed(String),
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

/// Reasons a member's client data could not be turned into a `Member`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("member has no client data")]
    MissingClientData,
    #[error("invalid member data: {0}")]
    InvalidMember(#[from] serde_json::Error),
    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}
