//! Client-facing error taxonomy for MQTT packet operations

use serde::{Deserialize, Serialize};

/// The error type returned by every builder and parser.
///
/// Success is represented by the `Ok` arm of [`Result`]; any `Err` means no
/// buffer, identifier or decoded field was produced by the call.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum MqttError {
    /// A descriptor or argument was malformed.
    BadParameter,
    /// A buffer could not be allocated or did not fit the packet.
    NoMemory,
    /// Sending or receiving on the network failed.
    NetworkError,
    /// The server sent a malformed or unexpected packet.
    BadResponse,
    /// The server refused the request.
    ServerRefused,
    /// No data was available, or the keep-alive period elapsed.
    Timeout,
    /// The wire-format library reported a status this layer does not know.
    Unknown,
}

impl core::fmt::Display for MqttError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MqttError::BadParameter => write!(f, "Bad parameter"),
            MqttError::NoMemory => write!(f, "Out of memory"),
            MqttError::NetworkError => write!(f, "Network error"),
            MqttError::BadResponse => write!(f, "Bad response from server"),
            MqttError::ServerRefused => write!(f, "Server refused the request"),
            MqttError::Timeout => write!(f, "Timed out"),
            MqttError::Unknown => write!(f, "Unknown wire-format status"),
        }
    }
}

impl core::error::Error for MqttError {}

#[cfg(feature = "defmt")]
impl defmt::Format for MqttError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MqttError::BadParameter => defmt::write!(f, "BadParameter"),
            MqttError::NoMemory => defmt::write!(f, "NoMemory"),
            MqttError::NetworkError => defmt::write!(f, "NetworkError"),
            MqttError::BadResponse => defmt::write!(f, "BadResponse"),
            MqttError::ServerRefused => defmt::write!(f, "ServerRefused"),
            MqttError::Timeout => defmt::write!(f, "Timeout"),
            MqttError::Unknown => defmt::write!(f, "Unknown"),
        }
    }
}

/// Result alias used throughout the MQTT layer.
pub type Result<T> = core::result::Result<T, MqttError>;
