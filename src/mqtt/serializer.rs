//! Outbound packet builders.
//!
//! Every builder runs the same steps:
//!
//! 1. translate the public descriptor into the wire descriptor
//! 2. ask the wire library for the exact packet size
//! 3. take a packet identifier, for packets that carry one
//! 4. allocate a buffer of exactly that size
//! 5. let the wire library fill the buffer
//! 6. hand the buffer (and identifier) to the caller
//!
//! A failed size query returns before any identifier or memory is taken. A
//! failure after allocation drops the [`ScopedBuffer`], which returns the
//! memory to the allocator, so callers only ever see complete packets.

use alloc::vec::Vec;
use heapless::Vec as BoundedVec;

use super::error::{MqttError, Result};
use super::identifier::PacketIdentifiers;
use super::memory::{Allocator, Heap, ScopedBuffer};
use super::status::translate;
use super::types::{
    CONNECT, ConnectInfo, DISCONNECT, PINGREQ, PUBACK, PUBLISH, PublishInfo, QoS, SUBSCRIBE,
    Subscription, UNSUBSCRIBE,
};
use super::wire::{
    Lightweight, MqttQos, WireConnectInfo, WireFormat, WirePublishInfo, WireSubscribeInfo,
};

/// Most topic filters a single SUBSCRIBE or UNSUBSCRIBE may carry.
pub const MAX_SUBSCRIPTIONS: usize = 16;

/// Size of a PUBACK packet: header, remaining length and identifier.
pub const PUBACK_PACKET_SIZE: usize = 4;

/// DUP bit in the first byte of a PUBLISH.
const PUBLISH_DUP_FLAG: u8 = 0x08;

/// QoS bits in the first byte of a PUBLISH.
const PUBLISH_QOS_MASK: u8 = 0x06;

/// A fully serialized packet, owned by the caller.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SerializedPacket {
    packet_type: u8,
    buffer: Vec<u8>,
    packet_identifier: Option<u16>,
}

impl SerializedPacket {
    fn new(packet_type: u8, buffer: Vec<u8>, packet_identifier: Option<u16>) -> Self {
        Self {
            packet_type,
            buffer,
            packet_identifier,
        }
    }

    /// Packet type byte this packet was built as, without flags.
    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    /// The bytes to put on the wire.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Total packet size in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false` for a packet returned by a builder.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Identifier carried by the packet, if it has one.
    pub fn packet_identifier(&self) -> Option<u16> {
        self.packet_identifier
    }

    /// Take the buffer out.
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }

    /// Mark a QoS 1 or 2 PUBLISH as a retransmission.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - The packet is not a PUBLISH, or is a
    ///   QoS 0 PUBLISH, which may never carry the DUP flag
    pub fn set_duplicate(&mut self) -> Result<()> {
        if self.packet_type != PUBLISH {
            return Err(MqttError::BadParameter);
        }
        let header = self.buffer.first_mut().ok_or(MqttError::BadParameter)?;
        if *header & PUBLISH_QOS_MASK == 0 {
            return Err(MqttError::BadParameter);
        }
        *header |= PUBLISH_DUP_FLAG;
        Ok(())
    }
}

fn wire_qos(qos: QoS) -> MqttQos {
    match qos {
        QoS::AtMostOnce => MqttQos::Qos0,
        QoS::AtLeastOnce => MqttQos::Qos1,
        QoS::ExactlyOnce => MqttQos::Qos2,
    }
}

fn wire_connect<'a>(connect: &ConnectInfo<'a>) -> WireConnectInfo<'a> {
    WireConnectInfo {
        clean_session: connect.clean_session,
        keep_alive_seconds: connect.keep_alive_seconds,
        client_identifier: connect.client_identifier,
        user_name: connect.user_name,
        password: connect.password,
    }
}

fn wire_will<'a>(will: &PublishInfo<'a>) -> WirePublishInfo<'a> {
    WirePublishInfo {
        qos: wire_qos(will.qos),
        retain: will.retain,
        dup: false,
        topic_name: will.topic_name,
        payload: will.payload,
    }
}

fn wire_publish<'a>(publish: &PublishInfo<'a>) -> WirePublishInfo<'a> {
    WirePublishInfo {
        qos: wire_qos(publish.qos),
        retain: publish.retain,
        // DUP follows the caller's retransmission state and is never set on QoS 0
        dup: publish.duplicate && publish.qos != QoS::AtMostOnce,
        topic_name: publish.topic_name,
        payload: publish.payload,
    }
}

fn wire_subscriptions<'a>(
    subscriptions: &[Subscription<'a>],
) -> Result<BoundedVec<WireSubscribeInfo<'a>, MAX_SUBSCRIPTIONS>> {
    let mut list = BoundedVec::new();
    for subscription in subscriptions {
        list.push(WireSubscribeInfo {
            qos: wire_qos(subscription.qos),
            topic_filter: subscription.topic_filter,
        })
        .map_err(|_| MqttError::BadParameter)?;
    }
    Ok(list)
}

/// Builds outbound MQTT packets.
///
/// Generic over the wire-format library, the buffer allocator, and the
/// identifier generator it draws from, so each can be replaced in tests.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::{QoS, Serializer, Subscription};
///
/// let serializer = Serializer::lightweight();
/// let filters = [
///     Subscription { qos: QoS::AtLeastOnce, topic_filter: "sensors/#" },
///     Subscription { qos: QoS::AtMostOnce, topic_filter: "alerts/+" },
/// ];
///
/// let packet = serializer.subscribe(&filters).unwrap();
/// assert_eq!(packet.packet_identifier().map(|id| id % 2), Some(1));
/// ```
#[derive(Debug)]
pub struct Serializer<'i, W = Lightweight, A = Heap> {
    wire: W,
    allocator: A,
    identifiers: &'i PacketIdentifiers,
}

impl Serializer<'static> {
    /// A serializer using [`Lightweight`], the [`Heap`] and the process-wide
    /// identifier generator.
    pub fn lightweight() -> Self {
        Self::new(Lightweight, Heap, PacketIdentifiers::global())
    }
}

impl<'i, W: WireFormat, A: Allocator> Serializer<'i, W, A> {
    /// Assemble a serializer from its collaborators.
    pub fn new(wire: W, allocator: A, identifiers: &'i PacketIdentifiers) -> Self {
        Self {
            wire,
            allocator,
            identifiers,
        }
    }

    /// The wire-format library in use.
    pub fn wire(&self) -> &W {
        &self.wire
    }

    /// The allocator in use.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    fn allocate(&self, size: usize) -> Result<ScopedBuffer<'_, A>> {
        let buffer = ScopedBuffer::acquire(&self.allocator, size).ok_or(MqttError::NoMemory)?;
        if buffer.len() != size {
            return Err(MqttError::NoMemory);
        }
        Ok(buffer)
    }

    fn next_identifier(&self) -> u16 {
        let packet_identifier = self.identifiers.next_identifier();
        trace!("assigned packet identifier {=u16}", packet_identifier);
        packet_identifier
    }

    /// Build a CONNECT packet.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - A field is too long for the protocol
    /// * [`MqttError::NoMemory`] - The packet buffer could not be allocated
    pub fn connect(&self, connect: &ConnectInfo<'_>) -> Result<SerializedPacket> {
        let connect_info = wire_connect(connect);
        let will = connect.will.as_ref().map(wire_will);

        let size = translate(self.wire.connect_packet_size(&connect_info, will.as_ref()))?;
        let mut buffer = self.allocate(size.packet_size)?;
        translate(self.wire.serialize_connect(
            &connect_info,
            will.as_ref(),
            size.remaining_length,
            &mut buffer,
        ))?;

        Ok(SerializedPacket::new(CONNECT, buffer.into_owned(), None))
    }

    /// Build a DISCONNECT packet.
    pub fn disconnect(&self) -> Result<SerializedPacket> {
        let size = translate(self.wire.disconnect_packet_size())?;
        let mut buffer = self.allocate(size)?;
        translate(self.wire.serialize_disconnect(&mut buffer))?;

        Ok(SerializedPacket::new(DISCONNECT, buffer.into_owned(), None))
    }

    /// Build a SUBSCRIBE packet for `subscriptions`, with a fresh identifier.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - The list is empty, longer than
    ///   [`MAX_SUBSCRIPTIONS`], or holds an empty filter
    /// * [`MqttError::NoMemory`] - The packet buffer could not be allocated
    pub fn subscribe(&self, subscriptions: &[Subscription<'_>]) -> Result<SerializedPacket> {
        let list = wire_subscriptions(subscriptions)?;

        let size = translate(self.wire.subscribe_packet_size(&list))?;
        let packet_identifier = self.next_identifier();
        let mut buffer = self.allocate(size.packet_size)?;
        translate(self.wire.serialize_subscribe(
            &list,
            packet_identifier,
            size.remaining_length,
            &mut buffer,
        ))?;

        Ok(SerializedPacket::new(
            SUBSCRIBE,
            buffer.into_owned(),
            Some(packet_identifier),
        ))
    }

    /// Build an UNSUBSCRIBE packet for the filters in `subscriptions`.
    ///
    /// The QoS of each entry is ignored.
    pub fn unsubscribe(&self, subscriptions: &[Subscription<'_>]) -> Result<SerializedPacket> {
        let list = wire_subscriptions(subscriptions)?;

        let size = translate(self.wire.unsubscribe_packet_size(&list))?;
        let packet_identifier = self.next_identifier();
        let mut buffer = self.allocate(size.packet_size)?;
        translate(self.wire.serialize_unsubscribe(
            &list,
            packet_identifier,
            size.remaining_length,
            &mut buffer,
        ))?;

        Ok(SerializedPacket::new(
            UNSUBSCRIBE,
            buffer.into_owned(),
            Some(packet_identifier),
        ))
    }

    /// Build a PUBLISH packet.
    ///
    /// Every PUBLISH draws a fresh packet identifier once its size is known.
    /// The identifier is only written on the wire for QoS 1 and 2.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - The topic is empty or too long
    /// * [`MqttError::NoMemory`] - The packet buffer could not be allocated
    pub fn publish(&self, publish: &PublishInfo<'_>) -> Result<SerializedPacket> {
        let publish_info = wire_publish(publish);

        let size = translate(self.wire.publish_packet_size(&publish_info))?;
        let packet_identifier = self.next_identifier();
        let mut buffer = self.allocate(size.packet_size)?;
        translate(self.wire.serialize_publish(
            &publish_info,
            packet_identifier,
            size.remaining_length,
            &mut buffer,
        ))?;

        Ok(SerializedPacket::new(
            PUBLISH,
            buffer.into_owned(),
            Some(packet_identifier),
        ))
    }

    /// Build a PINGREQ packet.
    pub fn pingreq(&self) -> Result<SerializedPacket> {
        let size = translate(self.wire.pingreq_packet_size())?;
        let mut buffer = self.allocate(size)?;
        translate(self.wire.serialize_pingreq(&mut buffer))?;

        Ok(SerializedPacket::new(PINGREQ, buffer.into_owned(), None))
    }

    /// Build a PUBACK acknowledging the PUBLISH with `packet_identifier`.
    ///
    /// # Errors
    ///
    /// * [`MqttError::BadParameter`] - `packet_identifier` is zero
    /// * [`MqttError::NoMemory`] - The packet buffer could not be allocated
    pub fn puback(&self, packet_identifier: u16) -> Result<SerializedPacket> {
        let mut buffer = self.allocate(PUBACK_PACKET_SIZE)?;
        translate(self.wire.serialize_ack(&mut buffer, PUBACK, packet_identifier))?;

        Ok(SerializedPacket::new(
            PUBACK,
            buffer.into_owned(),
            Some(packet_identifier),
        ))
    }
}
