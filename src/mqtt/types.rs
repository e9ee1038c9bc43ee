//! Public packet descriptors.
//!
//! These structures describe caller intent (what to connect with, what to
//! publish, what to subscribe to) and received packets. They are never handed
//! to the wire-format library directly; the builders and parsers translate
//! them to and from the descriptors in [`crate::mqtt::wire`].

use serde::{Deserialize, Serialize};

use super::error::{MqttError, Result};
use super::status::translate;
use super::wire::lightweight;

// MQTT Control Packet types - these are the fixed header packet type values
/// MQTT CONNECT packet type identifier.
pub const CONNECT: u8 = 0x10;
/// MQTT CONNACK packet type identifier.
pub const CONNACK: u8 = 0x20;
/// MQTT PUBLISH packet type identifier (flags cleared).
pub const PUBLISH: u8 = 0x30;
/// MQTT PUBACK packet type identifier.
pub const PUBACK: u8 = 0x40;
/// MQTT PUBREC packet type identifier.
pub const PUBREC: u8 = 0x50;
/// MQTT PUBREL packet type identifier (with its mandatory flags).
pub const PUBREL: u8 = 0x62;
/// MQTT PUBCOMP packet type identifier.
pub const PUBCOMP: u8 = 0x70;
/// MQTT SUBSCRIBE packet type identifier (with its mandatory flags).
pub const SUBSCRIBE: u8 = 0x82;
/// MQTT SUBACK packet type identifier.
pub const SUBACK: u8 = 0x90;
/// MQTT UNSUBSCRIBE packet type identifier (with its mandatory flags).
pub const UNSUBSCRIBE: u8 = 0xA2;
/// MQTT UNSUBACK packet type identifier.
pub const UNSUBACK: u8 = 0xB0;
/// MQTT PINGREQ packet type identifier.
pub const PINGREQ: u8 = 0xC0;
/// MQTT PINGRESP packet type identifier.
pub const PINGRESP: u8 = 0xD0;
/// MQTT DISCONNECT packet type identifier.
pub const DISCONNECT: u8 = 0xE0;

/// Quality of Service levels for MQTT messages.
///
/// QoS defines the guarantee of delivery for a specific message. Higher QoS levels
/// provide stronger delivery guarantees but require more network overhead and
/// client state management.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::QoS;
///
/// assert_eq!(QoS::AtMostOnce as u8, 0);
/// assert_eq!(QoS::try_from(1), Ok(QoS::AtLeastOnce));
/// assert!(QoS::try_from(3).is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum QoS {
    /// **QoS 0**: At most once delivery.
    AtMostOnce = 0,

    /// **QoS 1**: At least once delivery.
    ///
    /// Messages are assured to arrive but duplicates can occur.
    AtLeastOnce = 1,

    /// **QoS 2**: Exactly once delivery.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(MqttError::BadParameter),
        }
    }
}

/// A message to publish, or a message that was received.
///
/// The topic and payload are borrowed. For outgoing messages they belong to
/// the caller; for incoming messages they alias the received byte region.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PublishInfo<'a> {
    /// Quality of service of the message.
    pub qos: QoS,

    /// Whether the server should retain the message.
    pub retain: bool,

    /// Whether this is a retransmission of an earlier PUBLISH.
    ///
    /// Only meaningful for QoS 1 and 2; the DUP bit is never set for QoS 0.
    pub duplicate: bool,

    /// The topic name (no wildcards).
    pub topic_name: &'a str,

    /// The message payload.
    pub payload: &'a [u8],
}

/// Parameters of an MQTT connection request.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::ConnectInfo;
///
/// let info = ConnectInfo {
///     client_identifier: "weather_station",
///     keep_alive_seconds: 60,
///     clean_session: true,
///     user_name: None,
///     password: None,
///     will: None,
/// };
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ConnectInfo<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_identifier: &'a str,

    /// The keep-alive time interval in seconds. `0` disables keep-alive.
    pub keep_alive_seconds: u16,

    /// Whether to start a clean session.
    pub clean_session: bool,

    /// Optional user name for authentication.
    pub user_name: Option<&'a str>,

    /// Optional password for authentication.
    pub password: Option<&'a [u8]>,

    /// Optional last will and testament, published by the server if this
    /// client disconnects ungracefully.
    pub will: Option<PublishInfo<'a>>,
}

/// A topic filter with its requested QoS, used by SUBSCRIBE and UNSUBSCRIBE.
///
/// UNSUBSCRIBE ignores `qos`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Subscription<'a> {
    /// Maximum QoS the server should deliver at.
    pub qos: QoS,

    /// Topic filter, possibly containing `+` and `#` wildcards.
    pub topic_filter: &'a str,
}

/// A received packet awaiting decode.
///
/// The caller owns the descriptor and the byte region it points into. Parsers
/// only write into [`packet_identifier`](Self::packet_identifier) and
/// [`publish`](Self::publish), and only when decoding succeeds.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct IncomingPacket<'a> {
    /// First byte of the fixed header (packet type and flags).
    pub packet_type: u8,

    /// Variable header and payload; its length is the remaining length.
    pub remaining_data: &'a [u8],

    /// Decoded packet identifier.
    pub packet_identifier: u16,

    /// Decoded fields of an incoming PUBLISH.
    pub publish: Option<PublishInfo<'a>>,
}

impl<'a> IncomingPacket<'a> {
    /// Describe an already received packet with empty output slots.
    pub fn new(packet_type: u8, remaining_data: &'a [u8]) -> Self {
        Self {
            packet_type,
            remaining_data,
            packet_identifier: 0,
            publish: None,
        }
    }

    /// Split a complete frame (fixed header followed by remaining data).
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - The frame is empty
    /// * [`MqttError::BadResponse`] - The remaining length is malformed or
    ///   disagrees with the frame size
    pub fn from_frame(frame: &'a [u8]) -> Result<Self> {
        let (packet_type, remaining_data) = translate(lightweight::split_frame(frame))?;
        Ok(Self::new(packet_type, remaining_data))
    }

    /// Number of bytes following the fixed header.
    pub fn remaining_length(&self) -> usize {
        self.remaining_data.len()
    }
}
