//! Arithmetic on the sequence number ring ℤ/255ℤ.
//!
//! Stations count packets modulo 255, so the byte value 255 never appears on
//! the wire from a well-behaved producer.

use std::sync::atomic::{
    AtomicU8,
    Ordering,
};

pub type SequenceNumber = u8;

pub const SEQUENCE_MODULUS: u8 = 255;

/// Largest forward distance still considered "ahead" of a reference point.
pub const HALF_RANGE: u8 = SEQUENCE_MODULUS / 2;

/// Reduce an unbounded packet count onto the ring.
#[inline]
pub const fn reduce(n: u64) -> SequenceNumber {
    (n % SEQUENCE_MODULUS as u64) as SequenceNumber
}

/// Steps needed to walk forward from `from` to `to` on the ring, in `[0, 254]`.
///
/// Inputs outside the ring (255) are reduced first.
#[inline]
pub const fn forward_distance(from: SequenceNumber, to: SequenceNumber) -> u8 {
    let modulus = SEQUENCE_MODULUS as u16;
    let from = from as u16 % modulus;
    let to = to as u16 % modulus;

    ((to + modulus - from) % modulus) as u8
}

/// Producer-side packet counter. Yields `start, start + 1, ..., 254, 0, 1, ...`.
#[derive(Debug, Default)]
pub struct SequenceCounter(AtomicU8);

impl SequenceCounter {
    #[inline]
    pub const fn new(start: SequenceNumber) -> Self {
        Self(AtomicU8::new(start % SEQUENCE_MODULUS))
    }

    /// The value the next call to [`SequenceCounter::next`] will return.
    #[inline]
    pub fn peek(&self) -> SequenceNumber {
        self.0.load(Ordering::Acquire)
    }

    pub fn next(&self) -> SequenceNumber {
        let mut old = self.0.load(Ordering::Acquire);

        loop {
            let new = if old + 1 == SEQUENCE_MODULUS { 0 } else { old + 1 };

            match self.0.compare_exchange_weak(old, new, Ordering::Release, Ordering::Relaxed) {
                Ok(_) => return old,
                Err(x) => old = x,
            }
        }
    }
}
