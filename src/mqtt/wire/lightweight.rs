//! MQTT 3.1.1 byte codec.
//!
//! Implements [`WireFormat`] for the MQTT 3.1.1 packet layouts. Validation
//! follows the usual lightweight-library rules:
//!
//! - malformed outgoing descriptors are [`WireStatus::BadParameter`]
//! - buffers shorter than the packet are [`WireStatus::NoMemory`]
//! - malformed incoming packets are [`WireStatus::BadResponse`]
//! - CONNACK refusals and SUBACK failure codes are [`WireStatus::ServerRefused`]

use super::{
    MqttQos, PacketSize, WireConnectInfo, WireFormat, WirePacketInfo, WirePublishInfo,
    WireResult, WireStatus, WireSubscribeInfo,
};
use crate::mqtt::types::{
    CONNACK, CONNECT, DISCONNECT, PINGREQ, PINGRESP, PUBACK, PUBCOMP, PUBLISH, PUBREC, PUBREL,
    SUBACK, SUBSCRIBE, UNSUBACK, UNSUBSCRIBE,
};

// Protocol constants defined by MQTT 3.1.1 specification
/// MQTT protocol name as defined in the specification.
const PROTOCOL_NAME: &[u8] = b"MQTT";
/// MQTT protocol level for version 3.1.1.
const PROTOCOL_LEVEL: u8 = 4;

/// Largest value the remaining length field can encode.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Protocol name, level, flags and keep-alive.
const CONNECT_VARIABLE_HEADER_SIZE: usize = 10;

/// Size of every PUBACK, PUBREC, PUBREL and PUBCOMP packet.
pub const ACK_PACKET_SIZE: usize = 4;

/// Size of DISCONNECT and PINGREQ.
const EMPTY_PACKET_SIZE: usize = 2;

const CONNECT_FLAG_CLEAN: u8 = 0x02;
const CONNECT_FLAG_WILL: u8 = 0x04;
const CONNECT_FLAG_WILL_QOS1: u8 = 0x08;
const CONNECT_FLAG_WILL_QOS2: u8 = 0x10;
const CONNECT_FLAG_WILL_RETAIN: u8 = 0x20;
const CONNECT_FLAG_PASSWORD: u8 = 0x40;
const CONNECT_FLAG_USERNAME: u8 = 0x80;

const PUBLISH_FLAG_RETAIN: u8 = 0x01;
const PUBLISH_FLAG_DUP: u8 = 0x08;

/// SUBACK return code for a rejected subscription.
const SUBACK_FAILURE: u8 = 0x80;

/// The bundled MQTT 3.1.1 [`WireFormat`].
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::wire::{Lightweight, WireFormat};
///
/// let mut buffer = [0u8; 2];
/// Lightweight.serialize_pingreq(&mut buffer).unwrap();
/// assert_eq!(buffer, [0xC0, 0x00]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Lightweight;

/// Number of bytes the remaining length field takes for `length`.
pub fn remaining_length_size(length: usize) -> usize {
    match length {
        0..=127 => 1,
        128..=16_383 => 2,
        16_384..=2_097_151 => 3,
        _ => 4,
    }
}

/// Split a received frame into its first header byte and remaining data.
pub fn split_frame(frame: &[u8]) -> WireResult<(u8, &[u8])> {
    let (&packet_type, rest) = frame.split_first().ok_or(WireStatus::BadParameter)?;

    let mut remaining_length = 0usize;
    let mut multiplier = 1usize;
    let mut consumed = 0;
    loop {
        if consumed == 4 {
            return Err(WireStatus::BadResponse);
        }
        let byte = *rest.get(consumed).ok_or(WireStatus::BadResponse)?;
        consumed += 1;
        remaining_length += (byte as usize & 0x7F) * multiplier;
        multiplier *= 128;
        if byte & 0x80 == 0 {
            break;
        }
    }

    let remaining_data = &rest[consumed..];
    if remaining_data.len() != remaining_length {
        return Err(WireStatus::BadResponse);
    }
    Ok((packet_type, remaining_data))
}

fn packet_size(remaining_length: usize) -> WireResult<PacketSize> {
    if remaining_length > MAX_REMAINING_LENGTH {
        return Err(WireStatus::BadParameter);
    }
    Ok(PacketSize {
        remaining_length,
        packet_size: 1 + remaining_length_size(remaining_length) + remaining_length,
    })
}

/// Encoded size of a length-prefixed string or binary field.
fn field_size(length: usize) -> WireResult<usize> {
    if length > u16::MAX as usize {
        return Err(WireStatus::BadParameter);
    }
    Ok(2 + length)
}

fn validate_connect(connect: &WireConnectInfo<'_>) -> WireResult<()> {
    // a password without a user name is a protocol violation
    if connect.password.is_some() && connect.user_name.is_none() {
        return Err(WireStatus::BadParameter);
    }
    Ok(())
}

fn validate_publish(publish: &WirePublishInfo<'_>) -> WireResult<()> {
    if publish.topic_name.is_empty() {
        return Err(WireStatus::BadParameter);
    }
    if publish.qos == MqttQos::Qos0 && publish.dup {
        return Err(WireStatus::BadParameter);
    }
    Ok(())
}

fn qos_from_bits(bits: u8) -> WireResult<MqttQos> {
    match bits {
        0 => Ok(MqttQos::Qos0),
        1 => Ok(MqttQos::Qos1),
        2 => Ok(MqttQos::Qos2),
        _ => Err(WireStatus::BadResponse),
    }
}

/// Sequential writer over an exactly-sized packet buffer.
struct Writer<'b> {
    buffer: &'b mut [u8],
    position: usize,
}

impl<'b> Writer<'b> {
    /// Start a packet, checking that `buffer` can hold it.
    fn start(buffer: &'b mut [u8], header: u8, remaining_length: usize) -> WireResult<Self> {
        let size = packet_size(remaining_length)?.packet_size;
        if buffer.len() < size {
            return Err(WireStatus::NoMemory);
        }
        let mut writer = Self {
            buffer,
            position: 0,
        };
        writer.put_u8(header)?;
        writer.put_remaining_length(remaining_length)?;
        Ok(writer)
    }

    fn put_u8(&mut self, byte: u8) -> WireResult<()> {
        self.put_bytes(&[byte])
    }

    fn put_u16(&mut self, value: u16) -> WireResult<()> {
        self.put_bytes(&value.to_be_bytes())
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> WireResult<()> {
        let end = self.position + bytes.len();
        self.buffer
            .get_mut(self.position..end)
            .ok_or(WireStatus::NoMemory)?
            .copy_from_slice(bytes);
        self.position = end;
        Ok(())
    }

    fn put_field(&mut self, bytes: &[u8]) -> WireResult<()> {
        let length = u16::try_from(bytes.len()).map_err(|_| WireStatus::BadParameter)?;
        self.put_u16(length)?;
        self.put_bytes(bytes)
    }

    fn put_remaining_length(&mut self, mut length: usize) -> WireResult<()> {
        loop {
            let mut byte = (length % 128) as u8;
            length /= 128;
            if length > 0 {
                byte |= 0x80;
            }
            self.put_u8(byte)?;
            if length == 0 {
                return Ok(());
            }
        }
    }

    /// The fields written must add up to the declared remaining length.
    fn finish(self, remaining_length: usize) -> WireResult<()> {
        let expected = 1 + remaining_length_size(remaining_length) + remaining_length;
        if self.position != expected {
            return Err(WireStatus::BadParameter);
        }
        Ok(())
    }
}

/// Sequential reader over the remaining data of a received packet.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, count: usize) -> WireResult<&'a [u8]> {
        if self.data.len() < count {
            return Err(WireStatus::BadResponse);
        }
        let (head, tail) = self.data.split_at(count);
        self.data = tail;
        Ok(head)
    }

    fn u16(&mut self) -> WireResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn packet_identifier(&mut self) -> WireResult<u16> {
        match self.u16()? {
            0 => Err(WireStatus::BadResponse),
            id => Ok(id),
        }
    }

    fn rest(self) -> &'a [u8] {
        self.data
    }
}

fn subscription_list_size(
    subscriptions: &[WireSubscribeInfo<'_>],
    per_entry_overhead: usize,
) -> WireResult<PacketSize> {
    if subscriptions.is_empty() {
        return Err(WireStatus::BadParameter);
    }
    let mut remaining_length = 2;
    for subscription in subscriptions {
        if subscription.topic_filter.is_empty() {
            return Err(WireStatus::BadParameter);
        }
        remaining_length += field_size(subscription.topic_filter.len())? + per_entry_overhead;
    }
    packet_size(remaining_length)
}

fn decode_connack(remaining_data: &[u8], session_present: Option<&mut bool>) -> WireResult<u16> {
    let [flags, return_code] = remaining_data else {
        return Err(WireStatus::BadResponse);
    };
    if flags & !0x01 != 0 {
        return Err(WireStatus::BadResponse);
    }
    let present = flags & 0x01 == 0x01;
    match return_code {
        0 => {}
        _ if present => return Err(WireStatus::BadResponse),
        1..=5 => return Err(WireStatus::ServerRefused),
        _ => return Err(WireStatus::BadResponse),
    }
    if let Some(slot) = session_present {
        *slot = present;
    }
    Ok(0)
}

fn decode_suback(remaining_data: &[u8]) -> WireResult<u16> {
    let mut reader = Reader {
        data: remaining_data,
    };
    let packet_identifier = reader.packet_identifier()?;
    let return_codes = reader.rest();
    if return_codes.is_empty() {
        return Err(WireStatus::BadResponse);
    }

    let mut refused = false;
    for &code in return_codes {
        match code {
            0x00..=0x02 => {}
            SUBACK_FAILURE => refused = true,
            _ => return Err(WireStatus::BadResponse),
        }
    }
    if refused {
        return Err(WireStatus::ServerRefused);
    }
    Ok(packet_identifier)
}

fn decode_simple_ack(remaining_data: &[u8]) -> WireResult<u16> {
    if remaining_data.len() != 2 {
        return Err(WireStatus::BadResponse);
    }
    Reader {
        data: remaining_data,
    }
    .packet_identifier()
}

impl WireFormat for Lightweight {
    fn connect_packet_size(
        &self,
        connect: &WireConnectInfo<'_>,
        will: Option<&WirePublishInfo<'_>>,
    ) -> WireResult<PacketSize> {
        validate_connect(connect)?;
        let mut remaining_length =
            CONNECT_VARIABLE_HEADER_SIZE + field_size(connect.client_identifier.len())?;
        if let Some(will) = will {
            remaining_length += field_size(will.topic_name.len())? + field_size(will.payload.len())?;
        }
        if let Some(user_name) = connect.user_name {
            remaining_length += field_size(user_name.len())?;
        }
        if let Some(password) = connect.password {
            remaining_length += field_size(password.len())?;
        }
        packet_size(remaining_length)
    }

    fn serialize_connect(
        &self,
        connect: &WireConnectInfo<'_>,
        will: Option<&WirePublishInfo<'_>>,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()> {
        validate_connect(connect)?;
        let mut writer = Writer::start(buffer, CONNECT, remaining_length)?;

        // --- Variable Header ---
        writer.put_field(PROTOCOL_NAME)?;
        writer.put_u8(PROTOCOL_LEVEL)?;

        let mut connect_flags = 0;
        if connect.clean_session {
            connect_flags |= CONNECT_FLAG_CLEAN;
        }
        if let Some(will) = will {
            connect_flags |= CONNECT_FLAG_WILL;
            match will.qos {
                MqttQos::Qos0 => {}
                MqttQos::Qos1 => connect_flags |= CONNECT_FLAG_WILL_QOS1,
                MqttQos::Qos2 => connect_flags |= CONNECT_FLAG_WILL_QOS2,
            }
            if will.retain {
                connect_flags |= CONNECT_FLAG_WILL_RETAIN;
            }
        }
        if connect.password.is_some() {
            connect_flags |= CONNECT_FLAG_PASSWORD;
        }
        if connect.user_name.is_some() {
            connect_flags |= CONNECT_FLAG_USERNAME;
        }
        writer.put_u8(connect_flags)?;
        writer.put_u16(connect.keep_alive_seconds)?;

        // --- Payload ---
        writer.put_field(connect.client_identifier.as_bytes())?;
        if let Some(will) = will {
            writer.put_field(will.topic_name.as_bytes())?;
            writer.put_field(will.payload)?;
        }
        if let Some(user_name) = connect.user_name {
            writer.put_field(user_name.as_bytes())?;
        }
        if let Some(password) = connect.password {
            writer.put_field(password)?;
        }

        writer.finish(remaining_length)
    }

    fn subscribe_packet_size(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
    ) -> WireResult<PacketSize> {
        // each filter is followed by its requested QoS byte
        subscription_list_size(subscriptions, 1)
    }

    fn serialize_subscribe(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()> {
        if subscriptions.is_empty() || packet_identifier == 0 {
            return Err(WireStatus::BadParameter);
        }
        let mut writer = Writer::start(buffer, SUBSCRIBE, remaining_length)?;
        writer.put_u16(packet_identifier)?;
        for subscription in subscriptions {
            writer.put_field(subscription.topic_filter.as_bytes())?;
            writer.put_u8(subscription.qos as u8)?;
        }
        writer.finish(remaining_length)
    }

    fn unsubscribe_packet_size(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
    ) -> WireResult<PacketSize> {
        subscription_list_size(subscriptions, 0)
    }

    fn serialize_unsubscribe(
        &self,
        subscriptions: &[WireSubscribeInfo<'_>],
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()> {
        if subscriptions.is_empty() || packet_identifier == 0 {
            return Err(WireStatus::BadParameter);
        }
        let mut writer = Writer::start(buffer, UNSUBSCRIBE, remaining_length)?;
        writer.put_u16(packet_identifier)?;
        for subscription in subscriptions {
            writer.put_field(subscription.topic_filter.as_bytes())?;
        }
        writer.finish(remaining_length)
    }

    fn publish_packet_size(&self, publish: &WirePublishInfo<'_>) -> WireResult<PacketSize> {
        validate_publish(publish)?;
        let mut remaining_length = field_size(publish.topic_name.len())? + publish.payload.len();
        if publish.qos != MqttQos::Qos0 {
            remaining_length += 2;
        }
        packet_size(remaining_length)
    }

    fn serialize_publish(
        &self,
        publish: &WirePublishInfo<'_>,
        packet_identifier: u16,
        remaining_length: usize,
        buffer: &mut [u8],
    ) -> WireResult<()> {
        validate_publish(publish)?;
        if publish.qos != MqttQos::Qos0 && packet_identifier == 0 {
            return Err(WireStatus::BadParameter);
        }

        let mut header = PUBLISH | ((publish.qos as u8) << 1);
        if publish.dup {
            header |= PUBLISH_FLAG_DUP;
        }
        if publish.retain {
            header |= PUBLISH_FLAG_RETAIN;
        }

        let mut writer = Writer::start(buffer, header, remaining_length)?;
        writer.put_field(publish.topic_name.as_bytes())?;
        if publish.qos != MqttQos::Qos0 {
            writer.put_u16(packet_identifier)?;
        }
        writer.put_bytes(publish.payload)?;
        writer.finish(remaining_length)
    }

    fn disconnect_packet_size(&self) -> WireResult<usize> {
        Ok(EMPTY_PACKET_SIZE)
    }

    fn serialize_disconnect(&self, buffer: &mut [u8]) -> WireResult<()> {
        Writer::start(buffer, DISCONNECT, 0)?.finish(0)
    }

    fn pingreq_packet_size(&self) -> WireResult<usize> {
        Ok(EMPTY_PACKET_SIZE)
    }

    fn serialize_pingreq(&self, buffer: &mut [u8]) -> WireResult<()> {
        Writer::start(buffer, PINGREQ, 0)?.finish(0)
    }

    fn serialize_ack(
        &self,
        buffer: &mut [u8],
        packet_type: u8,
        packet_identifier: u16,
    ) -> WireResult<()> {
        if buffer.len() < ACK_PACKET_SIZE {
            return Err(WireStatus::NoMemory);
        }
        if !matches!(packet_type, PUBACK | PUBREC | PUBREL | PUBCOMP) || packet_identifier == 0 {
            return Err(WireStatus::BadParameter);
        }
        let mut writer = Writer::start(buffer, packet_type, 2)?;
        writer.put_u16(packet_identifier)?;
        writer.finish(2)
    }

    fn deserialize_ack(
        &self,
        packet: &WirePacketInfo<'_>,
        session_present: Option<&mut bool>,
    ) -> WireResult<u16> {
        match packet.packet_type {
            CONNACK => decode_connack(packet.remaining_data, session_present),
            SUBACK => decode_suback(packet.remaining_data),
            UNSUBACK | PUBACK | PUBREC | PUBREL | PUBCOMP => {
                decode_simple_ack(packet.remaining_data)
            }
            PINGRESP if packet.remaining_data.is_empty() => Ok(0),
            PINGRESP => Err(WireStatus::BadResponse),
            _ => Err(WireStatus::BadParameter),
        }
    }

    fn deserialize_publish<'a>(
        &self,
        packet: &WirePacketInfo<'a>,
    ) -> WireResult<(u16, WirePublishInfo<'a>)> {
        if packet.packet_type & 0xF0 != PUBLISH {
            return Err(WireStatus::BadParameter);
        }
        let qos = qos_from_bits((packet.packet_type >> 1) & 0x03)?;

        let mut reader = Reader {
            data: packet.remaining_data,
        };
        let topic_length = reader.u16()? as usize;
        if topic_length == 0 {
            return Err(WireStatus::BadResponse);
        }
        let topic_name =
            core::str::from_utf8(reader.take(topic_length)?).map_err(|_| WireStatus::BadResponse)?;
        let packet_identifier = match qos {
            MqttQos::Qos0 => 0,
            MqttQos::Qos1 | MqttQos::Qos2 => reader.packet_identifier()?,
        };

        Ok((
            packet_identifier,
            WirePublishInfo {
                qos,
                retain: packet.packet_type & PUBLISH_FLAG_RETAIN != 0,
                dup: packet.packet_type & PUBLISH_FLAG_DUP != 0,
                topic_name,
                payload: reader.rest(),
            },
        ))
    }
}
