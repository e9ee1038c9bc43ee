//! Client configuration.
//!
//! Connection parameters can be kept as a small JSON document (in flash, in a
//! provisioning blob) and turned into a [`ConnectInfo`] without copying:
//! every string borrows from the document.
//!
//! ```rust
//! use libiot_mqtt::config::ClientConfig;
//!
//! let json = br#"{"client_id":"sensor_node_1","keep_alive_seconds":120,"clean_session":true}"#;
//! let config = ClientConfig::from_json(json).unwrap();
//!
//! let connect = config.connect_info();
//! assert_eq!(connect.client_identifier, "sensor_node_1");
//! assert_eq!(connect.keep_alive_seconds, 120);
//! ```

use serde::{Deserialize, Serialize};

use crate::mqtt::{ConnectInfo, MqttError, Result};

/// Connection settings for an MQTT client.
///
/// JSON strings must not contain escape sequences, since fields borrow
/// directly from the document.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ClientConfig<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_id: &'a str,

    /// The keep-alive time interval in seconds.
    pub keep_alive_seconds: u16,

    /// Whether to start a clean session.
    pub clean_session: bool,

    /// Optional user name for authentication.
    #[serde(default, borrow)]
    pub user_name: Option<&'a str>,

    /// Optional password for authentication.
    #[serde(default, borrow)]
    pub password: Option<&'a str>,
}

impl<'a> ClientConfig<'a> {
    /// Parse a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - The document is not valid JSON, or is
    ///   missing a required field
    pub fn from_json(json: &'a [u8]) -> Result<Self> {
        let (config, _) =
            serde_json_core::from_slice::<Self>(json).map_err(|_| MqttError::BadParameter)?;
        debug!("loaded client configuration");
        Ok(config)
    }

    /// The CONNECT descriptor for these settings, without a will message.
    pub fn connect_info(&self) -> ConnectInfo<'a> {
        ConnectInfo {
            client_identifier: self.client_id,
            keep_alive_seconds: self.keep_alive_seconds,
            clean_session: self.clean_session,
            user_name: self.user_name,
            password: self.password.map(str::as_bytes),
            will: None,
        }
    }
}
