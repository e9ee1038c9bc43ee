//! Packet buffer allocation.
//!
//! Builders acquire their output buffer through an [`Allocator`] and hold it
//! in a [`ScopedBuffer`]. The scoped buffer hands the memory back to the
//! allocator on every exit path except the one that transfers ownership to
//! the caller, so a failed serialization never leaks its buffer.

use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// Source of packet buffers.
pub trait Allocator {
    /// Allocate a zeroed buffer of exactly `size` bytes.
    ///
    /// Returns `None` when the memory is not available.
    fn allocate(&self, size: usize) -> Option<Vec<u8>>;

    /// Take back a buffer that was never handed to a caller.
    fn release(&self, buffer: Vec<u8>) {
        drop(buffer);
    }
}

/// The global heap, with fallible reservation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, size: usize) -> Option<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(size).ok()?;
        buffer.resize(size, 0);
        Some(buffer)
    }
}

/// A buffer on loan from an [`Allocator`].
///
/// Dropping it returns the buffer to the allocator;
/// [`into_owned`](Self::into_owned) keeps it.
#[derive(Debug)]
pub struct ScopedBuffer<'a, A: Allocator + ?Sized> {
    buffer: Option<Vec<u8>>,
    allocator: &'a A,
}

impl<'a, A: Allocator + ?Sized> ScopedBuffer<'a, A> {
    /// Allocate `size` bytes from `allocator`.
    pub fn acquire(allocator: &'a A, size: usize) -> Option<Self> {
        let buffer = allocator.allocate(size)?;
        Some(Self {
            buffer: Some(buffer),
            allocator,
        })
    }

    /// Transfer ownership of the buffer out of the scope.
    pub fn into_owned(mut self) -> Vec<u8> {
        self.buffer.take().unwrap_or_default()
    }
}

impl<A: Allocator + ?Sized> Deref for ScopedBuffer<'_, A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or(&[])
    }
}

impl<A: Allocator + ?Sized> DerefMut for ScopedBuffer<'_, A> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or(&mut [])
    }
}

impl<A: Allocator + ?Sized> Drop for ScopedBuffer<'_, A> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.allocator.release(buffer);
        }
    }
}
