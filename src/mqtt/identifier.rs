//! Packet identifier generation.
//!
//! MQTT 3.1.1 forbids packet identifier zero. Identifiers here start at 1 and
//! advance by 2, giving the sequence `1, 3, 5, ..., 65535, 1, 3, ...`.
//!
//! The counter is 32 bits wide and truncated on return. Since 2^32 is a
//! multiple of 2^16, wrapping the wide counter keeps the truncated sequence
//! odd and gap-free.

use core::sync::atomic::{AtomicU32, Ordering};

/// Value returned by the first call on a fresh generator.
pub const FIRST_PACKET_IDENTIFIER: u16 = 1;

static GLOBAL: PacketIdentifiers = PacketIdentifiers::new();

/// A lock-free packet identifier generator.
///
/// Builders take a reference to one of these rather than reaching for a
/// hidden global, so tests can hand them a fresh counter.
///
/// # Examples
///
/// ```rust
/// use libiot_mqtt::mqtt::PacketIdentifiers;
///
/// let ids = PacketIdentifiers::new();
/// assert_eq!(ids.next_identifier(), 1);
/// assert_eq!(ids.next_identifier(), 3);
/// assert_eq!(ids.next_identifier(), 5);
/// ```
#[derive(Debug)]
pub struct PacketIdentifiers {
    next: AtomicU32,
}

impl PacketIdentifiers {
    /// Create a generator whose first identifier is 1.
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(FIRST_PACKET_IDENTIFIER as u32),
        }
    }

    /// The process-wide generator.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Take the next identifier.
    ///
    /// Safe to call from any number of threads; no two calls observe the same
    /// value until the 16-bit sequence wraps. Never returns zero.
    #[inline]
    pub fn next_identifier(&self) -> u16 {
        // fetch_add wraps on overflow
        self.next.fetch_add(2, Ordering::Relaxed) as u16
    }
}

impl Default for PacketIdentifiers {
    fn default() -> Self {
        Self::new()
    }
}
