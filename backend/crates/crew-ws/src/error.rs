use crate::ConnectionId;
use crate::protocol::ErrorEvent;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow {location}")]
    SendBufferFull { location: ErrorLocation },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Unknown connection: {connection_id} {location}")]
    UnknownConnection {
        connection_id: ConnectionId,
        location: ErrorLocation,
    },

    #[error("Invalid event: {message} {location}")]
    InvalidEvent {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not registered: {message} {location}")]
    NotRegistered {
        message: String,
        location: ErrorLocation,
    },

    #[error("Event encode failed: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl WsError {
    /// Human-readable message safe to hand to a client. Unlike the `Display`
    /// form this carries no source location, and internal variants collapse
    /// to a generic line; file paths stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::ConnectionClosed { reason, .. } => format!("Connection closed: {reason}"),
            Self::SendBufferFull { .. } => String::from("Send buffer full, client too slow"),
            Self::ConnectionLimitExceeded { current, max, .. } => {
                format!("Connection limit exceeded: {current} connections (max: {max})")
            }
            Self::UnknownConnection { connection_id, .. } => {
                format!("Unknown connection: {connection_id}")
            }
            Self::InvalidEvent { message, .. } => format!("Invalid event: {message}"),
            Self::NotRegistered { message, .. } => format!("Not registered: {message}"),
            Self::Encode { .. } => String::from("Event encode failed"),
            Self::Internal { .. } => String::from("Internal error"),
        }
    }

    /// Convert to the wire-level `error` event sent back to the offending
    /// client.
    pub fn to_error_event(&self) -> ErrorEvent {
        ErrorEvent {
            message: self.client_message(),
        }
    }
}

impl From<serde_json::Error> for WsError {
    fn from(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
