//! # libiot-mqtt - MQTT 3.1.1 packet layer
//!
//! The packet-orchestration layer of an MQTT 3.1.1 client. It turns client
//! level intents ("connect with these credentials", "publish this message",
//! "subscribe to these filters") into on-wire MQTT packets, and turns server
//! responses back into typed, inspectable results.
//!
//! ## Features
//!
//! - **Packet identifiers**: a lock-free, process-wide generator producing the
//!   odd sequence `1, 3, 5, ..., 65535, 1, ...`
//! - **Outbound builders**: CONNECT, DISCONNECT, SUBSCRIBE, UNSUBSCRIBE,
//!   PUBLISH, PINGREQ and PUBACK, each returning an exactly-sized owned buffer
//! - **Inbound parsers**: CONNACK, SUBACK, UNSUBACK, PUBACK, PINGRESP and
//!   PUBLISH, decoding into caller-provided descriptors without copying
//!   payload bytes
//! - **Pluggable collaborators**: the byte-level codec ([`mqtt::wire::WireFormat`])
//!   and the buffer allocator ([`mqtt::memory::Allocator`]) are traits, with
//!   [`mqtt::wire::Lightweight`] and [`mqtt::memory::Heap`] as defaults
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libiot-mqtt = "0.1.0"
//! ```
//!
//! ### Publishing
//!
//! ```rust
//! use libiot_mqtt::mqtt::{PublishInfo, QoS, Serializer};
//!
//! let serializer = Serializer::lightweight();
//! let publish = PublishInfo {
//!     qos: QoS::AtLeastOnce,
//!     retain: false,
//!     duplicate: false,
//!     topic_name: "sensors/temperature",
//!     payload: b"23.5",
//! };
//!
//! let packet = serializer.publish(&publish).unwrap();
//! assert!(packet.packet_identifier().is_some());
//! // transport.write(packet.buffer())?;
//! ```
//!
//! ### Decoding a server response
//!
//! ```rust
//! use libiot_mqtt::mqtt::{Deserializer, IncomingPacket};
//!
//! let deserializer = Deserializer::lightweight();
//! let frame = [0x40, 0x02, 0x00, 0x07];
//! let mut puback = IncomingPacket::from_frame(&frame).unwrap();
//!
//! deserializer.puback(&mut puback).unwrap();
//! assert_eq!(puback.packet_identifier, 7);
//! ```
//!
//! ## Platform Support
//!
//! The crate is `no_std` and needs only `alloc` for packet buffers.
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://shishir-dey.github.io/libiot/")]

extern crate alloc;

#[macro_use]
mod fmt;

/// MQTT 3.1.1 packet serialization and deserialization.
///
/// Contains the identifier generator, status translation, the outbound
/// packet builders and the inbound packet parsers, plus the collaborator
/// traits they are built on.
pub mod mqtt;

/// Client configuration loaded from JSON documents.
pub mod config;
