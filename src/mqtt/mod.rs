//! MQTT 3.1.1 packet serialization layer.
//!
//! This module sits between an MQTT client's session logic and the byte-level
//! codec. Outbound, it turns a public descriptor into an exactly sized,
//! caller-owned packet buffer. Inbound, it decodes a received packet into the
//! descriptor's output slots.
//!
//! # Architecture
//!
//! ```text
//!  ConnectInfo / PublishInfo / Subscription        IncomingPacket
//!                 │                                       ▲
//!                 ▼                                       │
//!  ┌──────────────────────────┐          ┌──────────────────────────┐
//!  │        Serializer        │          │       Deserializer       │
//!  │ translate → size → id →  │          │ wrap → decode → translate│
//!  │ allocate → serialize     │          │ → copy out               │
//!  └──────────────────────────┘          └──────────────────────────┘
//!        │              │                             │
//!        ▼              ▼                             ▼
//!  PacketIdentifiers  Allocator              WireFormat (Lightweight)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use libiot_mqtt::mqtt::{
//!     Deserializer, IncomingPacket, PacketIdentifiers, PublishInfo, QoS, Serializer,
//! };
//! use libiot_mqtt::mqtt::memory::Heap;
//! use libiot_mqtt::mqtt::wire::Lightweight;
//!
//! let identifiers = PacketIdentifiers::new();
//! let serializer = Serializer::new(Lightweight, Heap, &identifiers);
//! let deserializer = Deserializer::lightweight();
//!
//! let packet = serializer
//!     .publish(&PublishInfo {
//!         qos: QoS::AtLeastOnce,
//!         retain: true,
//!         duplicate: false,
//!         topic_name: "a/b",
//!         payload: &[0x01, 0x02],
//!     })
//!     .unwrap();
//! assert_eq!(packet.packet_identifier(), Some(1));
//!
//! let mut incoming = IncomingPacket::from_frame(packet.buffer()).unwrap();
//! deserializer.publish(&mut incoming).unwrap();
//! let publish = incoming.publish.unwrap();
//! assert_eq!(publish.topic_name, "a/b");
//! assert_eq!(publish.payload, &[0x01, 0x02]);
//! ```

/// Client-facing error taxonomy.
pub mod error;

/// Packet identifier generation.
pub mod identifier;

/// Packet buffer allocation.
pub mod memory;

/// Wire-library status translation.
pub mod status;

/// Public packet descriptors and packet type bytes.
pub mod types;

/// The wire-format library seam and its bundled implementation.
pub mod wire;

mod deserializer;
mod serializer;


pub use deserializer::Deserializer;
pub use error::{MqttError, Result};
pub use identifier::PacketIdentifiers;
pub use serializer::{MAX_SUBSCRIPTIONS, PUBACK_PACKET_SIZE, SerializedPacket, Serializer};
pub use status::translate;
pub use types::{ConnectInfo, IncomingPacket, PublishInfo, QoS, Subscription};
