use std::fmt;

use crate::DeviceId;

#[derive(Debug)]
pub enum Error {
    MalformedMessage(String),
    InvalidValue { device: DeviceId, reason: String },
    ReadOnlyDevice(DeviceId),
    TransportClosed,
    WebSocket(tokio_tungstenite::tungstenite::error::Error),
    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_value<R: Into<String>>(device: DeviceId, reason: R) -> Self {
        Self::InvalidValue {
            device,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<tokio_tungstenite::tungstenite::error::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::error::Error) -> Self {
        use tokio_tungstenite::tungstenite::error::Error as WsError;

        match err {
            WsError::AlreadyClosed | WsError::ConnectionClosed => Self::TransportClosed,
            err => Self::WebSocket(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedMessage(reason) => write!(f, "malformed message: {reason}"),
            Self::InvalidValue { device, reason } => {
                write!(f, "invalid value for {device}: {reason}")
            }
            Self::ReadOnlyDevice(device) => write!(f, "{device} cannot be set from the panel"),
            Self::TransportClosed => write!(f, "transport closed"),
            Self::WebSocket(err) => write!(f, "websocket error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
