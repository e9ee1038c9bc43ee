//! The wire-format library seam.
//!
//! Builders and parsers never touch MQTT bytes themselves. They translate the
//! public descriptors into the wire descriptors defined here and hand them to
//! a [`WireFormat`] implementation, which owns the fixed header, remaining
//! length encoding, string validation and per-packet byte layout.
//!
//! Every [`WireFormat`] operation reports failure as a [`WireStatus`], which
//! the status translator maps into [`MqttError`](crate::mqtt::MqttError).
//!
//! [`Lightweight`] is the bundled MQTT 3.1.1 implementation.

#![allow(missing_docs)]

/// Bundled MQTT 3.1.1 byte codec.
pub mod lightweight;

pub use lightweight::Lightweight;

/// Result of a wire-format operation.
pub type WireResult<T> = core::result::Result<T, WireStatus>;

/// Failure status reported by the wire-format library.
///
/// The numeric codes match the wire library's status enumeration, where `0`
/// is success. Codes outside the known range are kept as
/// [`WireStatus::Unrecognized`] rather than dropped.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WireStatus {
    /// A descriptor or buffer argument was invalid.
    BadParameter,
    /// The supplied buffer is too small.
    NoMemory,
    /// The transport failed to send.
    SendFailed,
    /// The transport failed to receive.
    RecvFailed,
    /// An incoming packet was malformed.
    BadResponse,
    /// The server refused a CONNECT or a subscription.
    ServerRefused,
    /// No data was available from the transport.
    NoDataAvailable,
    /// An operation was issued in the wrong state.
    IllegalState,
    /// Two operations collided on the same state.
    StateCollision,
    /// No PINGRESP arrived within the keep-alive period.
    KeepAliveTimeout,
    /// A status code this layer does not know.
    Unrecognized(u8),
}

impl WireStatus {
    /// Code the wire library uses for success.
    pub const SUCCESS_CODE: u8 = 0;

    /// Interpret a raw status code; `0` is success.
    pub fn from_code(code: u8) -> WireResult<()> {
        let status = match code {
            Self::SUCCESS_CODE => return Ok(()),
            1 => WireStatus::BadParameter,
            2 => WireStatus::NoMemory,
            3 => WireStatus::SendFailed,
            4 => WireStatus::RecvFailed,
            5 => WireStatus::BadResponse,
            6 => WireStatus::ServerRefused,
            7 => WireStatus::NoDataAvailable,
            8 => WireStatus::IllegalState,
            9 => WireStatus::StateCollision,
            10 => WireStatus::KeepAliveTimeout,
            other => WireStatus::Unrecognized(other),
        };
        Err(status)
    }

    /// Raw status code of this failure.
    pub fn code(self) -> u8 {
        match self {
            WireStatus::BadParameter => 1,
            WireStatus::NoMemory => 2,
            WireStatus::SendFailed => 3,
            WireStatus::RecvFailed => 4,
            WireStatus::BadResponse => 5,
            WireStatus::ServerRefused => 6,
            WireStatus::NoDataAvailable => 7,
            WireStatus::IllegalState => 8,
            WireStatus::StateCollision => 9,
            WireStatus::KeepAliveTimeout => 10,
            WireStatus::Unrecognized(code) => code,
        }
    }
}

/// QoS as the wire library represents it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MqttQos {
    /// Delivery at most once.
    Qos0 = 0,
    /// Delivery at least once.
    Qos1 = 1,
    /// Delivery exactly once.
    Qos2 = 2,
}

/// Size of a packet as computed by the wire library.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PacketSize {
    /// Bytes following the fixed header.
    pub remaining_length: usize,
    /// Total bytes of the packet, fixed header included.
    pub packet_size: usize,
}

/// CONNECT fields in the wire library's layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WireConnectInfo<'a> {
    pub clean_session: bool,
    pub keep_alive_seconds: u16,
    pub client_identifier: &'a str,
    pub user_name: Option<&'a str>,
    pub password: Option<&'a [u8]>,
}

/// PUBLISH (and will message) fields in the wire library's layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WirePublishInfo<'a> {
    pub qos: MqttQos,
    pub retain: bool,
    pub dup: bool,
    pub topic_name: &'a str,
    pub payload: &'a [u8],
}

/// One SUBSCRIBE or UNSUBSCRIBE entry in the wire library's layout.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WireSubscribeInfo<'a> {
    pub qos: MqttQos,
    pub topic_filter: &'a str,
}

/// A received packet as the wire library's decoders expect it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WirePacketInfo<'a> {
    pub packet_type: u8,
    pub remaining_data: &'a [u8],
}

/// Byte-level MQTT encode and decode.
///
/// Size queries always precede serialization: a builder asks for the
/// [`PacketSize`], allocates exactly `packet_size` bytes, then hands that
/// buffer and the `remaining_length` back to the matching `serialize_*`.
pub trait WireFormat {
    /// Size of a CONNECT packet, with an optional will message.
    fn connect_packet_size(
        &self,
        connect: &WireConnectInfo<'_>,
        will: Option<&WirePublishInfo<'_>>,
    ) -> WireResult<PacketSize>;

    /// Write a CONNECT packet into `buffer`.
    fn serialize_connect(
        &self,
        connect: &WireConnectInfo<'_>,
        will: Option<&WirePublishInfo<'_>>,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()>;

    /// Size of a SUBSCRIBE packet for `subscriptions`.
    fn subscribe_packet_size(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
    ) -> WireResult<PacketSize>;

    /// Write a SUBSCRIBE packet into `buffer`.
    fn serialize_subscribe(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()>;

    /// Size of an UNSUBSCRIBE packet for `subscriptions`.
    fn unsubscribe_packet_size(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
    ) -> WireResult<PacketSize>;

    /// Write an UNSUBSCRIBE packet into `buffer`.
    fn serialize_unsubscribe(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()>;

    /// Size of a PUBLISH packet.
    fn publish_packet_size(&self, publish: &WirePublishInfo<'_>) -> WireResult<PacketSize>;

    /// Write a PUBLISH packet into `buffer`.
    fn serialize_publish(
        &self,
        publish: &WirePublishInfo<'_>,
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()>;

    /// Size of a DISCONNECT packet.
    fn disconnect_packet_size(&self) -> WireResult<usize>;

    /// Write a DISCONNECT packet into `buffer`.
    fn serialize_disconnect(&self, buffer: &mut [u8]) -> WireResult<()>;

    /// Size of a PINGREQ packet.
    fn pingreq_packet_size(&self) -> WireResult<usize>;

    /// Write a PINGREQ packet into `buffer`.
    fn serialize_pingreq(&self, buffer: &mut [u8]) -> WireResult<()>;

    /// Write a PUBACK, PUBREC, PUBREL or PUBCOMP packet into `buffer`.
    fn serialize_ack(
        &self,
        buffer: &mut [u8],
        packet_type: u8,
        packet_identifier: u16,
    ) -> WireResult<()>;

    /// Decode CONNACK, SUBACK, UNSUBACK, PUBACK-family or PINGRESP.
    ///
    /// Returns the packet identifier (`0` for packets without one). The
    /// session-present flag is written only for CONNACK and only when a slot
    /// is supplied.
    fn deserialize_ack(
        &self,
        packet: &WirePacketInfo<'_>,
        session_present: Option<&mut bool>,
    ) -> WireResult<u16>;

    /// Decode a PUBLISH, returning its packet identifier and fields.
    ///
    /// Topic and payload borrow from `packet.remaining_data`.
    fn deserialize_publish<'a>(
        &self,
        packet: &WirePacketInfo<'a>,
    ) -> WireResult<(u16, WirePublishInfo<'a>)>;
}
