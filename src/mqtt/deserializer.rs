//! Inbound packet parsers.
//!
//! Each parser is a single-shot transformation of an [`IncomingPacket`]: wrap
//! it for the wire library, decode, translate the status, and on success copy
//! the decoded fields into the descriptor's output slots. On failure the
//! descriptor is left exactly as the caller provided it.
//!
//! Parsers never allocate. Decoded topics and payloads borrow the received
//! byte region, which stays owned by whoever received it.

use super::error::Result;
use super::status::translate;
use super::types::{IncomingPacket, PublishInfo, QoS};
use super::wire::{Lightweight, MqttQos, WireFormat, WirePacketInfo, WirePublishInfo};

fn wire_packet<'a>(packet: &IncomingPacket<'a>) -> WirePacketInfo<'a> {
    WirePacketInfo {
        packet_type: packet.packet_type,
        remaining_data: packet.remaining_data,
    }
}

fn public_qos(qos: MqttQos) -> QoS {
    match qos {
        MqttQos::Qos0 => QoS::AtMostOnce,
        MqttQos::Qos1 => QoS::AtLeastOnce,
        MqttQos::Qos2 => QoS::ExactlyOnce,
    }
}

fn public_publish<'a>(publish: &WirePublishInfo<'a>) -> PublishInfo<'a> {
    PublishInfo {
        qos: public_qos(publish.qos),
        retain: publish.retain,
        duplicate: publish.dup,
        topic_name: publish.topic_name,
        payload: publish.payload,
    }
}

/// Decodes inbound MQTT packets.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::{Deserializer, IncomingPacket, MqttError};
///
/// let deserializer = Deserializer::lightweight();
///
/// // CONNACK refusing the connection: bad user name or password
/// let mut connack = IncomingPacket::new(0x20, &[0x00, 0x04]);
/// assert_eq!(deserializer.connack(&mut connack), Err(MqttError::ServerRefused));
/// ```
#[derive(Debug, Default)]
pub struct Deserializer<W = Lightweight> {
    wire: W,
}

impl Deserializer {
    /// A deserializer using [`Lightweight`].
    pub fn lightweight() -> Self {
        Self::new(Lightweight)
    }
}

impl<W: WireFormat> Deserializer<W> {
    /// Wrap a wire-format library.
    pub fn new(wire: W) -> Self {
        Self { wire }
    }

    /// The wire-format library in use.
    pub fn wire(&self) -> &W {
        &self.wire
    }

    fn ack(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        let packet_identifier = translate(self.wire.deserialize_ack(&wire_packet(packet), None))?;
        packet.packet_identifier = packet_identifier;
        Ok(())
    }

    /// Decode a CONNACK.
    ///
    /// A refused connection is [`MqttError::ServerRefused`](super::MqttError::ServerRefused).
    /// The session-present flag is checked for consistency and then dropped.
    /// CONNACK carries no identifier, so the descriptor is never written.
    pub fn connack(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        let mut session_present = false;
        translate(
            self.wire
                .deserialize_ack(&wire_packet(packet), Some(&mut session_present)),
        )?;
        debug!("CONNACK session present: {=bool}", session_present);
        Ok(())
    }

    /// Decode a SUBACK into the descriptor's packet identifier.
    ///
    /// Any rejected filter makes the whole SUBACK
    /// [`MqttError::ServerRefused`](super::MqttError::ServerRefused).
    pub fn suback(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        self.ack(packet)
    }

    /// Decode an UNSUBACK into the descriptor's packet identifier.
    pub fn unsuback(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        self.ack(packet)
    }

    /// Decode a PUBACK into the descriptor's packet identifier.
    pub fn puback(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        self.ack(packet)
    }

    /// Decode a PINGRESP. The descriptor is never written.
    pub fn pingresp(&self, packet: &mut IncomingPacket<'_>) -> Result<()> {
        translate(self.wire.deserialize_ack(&wire_packet(packet), None))?;
        Ok(())
    }

    /// Decode an incoming PUBLISH.
    ///
    /// On success [`IncomingPacket::publish`] holds the QoS, retain and DUP
    /// flags, and the topic and payload as slices of the received data.
    pub fn publish<'a>(&self, packet: &mut IncomingPacket<'a>) -> Result<()> {
        let (packet_identifier, publish) =
            translate(self.wire.deserialize_publish(&wire_packet(packet)))?;
        packet.packet_identifier = packet_identifier;
        packet.publish = Some(public_publish(&publish));
        Ok(())
    }
}
