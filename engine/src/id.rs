//! Record id generation.
//!
//! Ids must be unique across every client and the server even when clients
//! create records while offline, so they cannot come from a shared sequence.
//!
//! Salted ids stay at or below [`MAX_SAFE_ID`] so they survive remotes that
//! store numbers as IEEE-754 doubles (JavaScript servers, JSON tooling).

use crate::RecordId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Largest id a double represents exactly (`2^53 - 1`).
pub const MAX_SAFE_ID: RecordId = (1 << 53) - 1;

/// Source of fresh record ids.
pub trait IdGenerator: Send + Sync {
    /// Produce an id that has not been produced before.
    fn next_id(&self) -> RecordId;
}

/// Default generator: a random per-process salt plus a local counter.
///
/// Each id is `mix(salt + counter)` over 53 bits, where `mix` is the
/// SplitMix64 finalizer reduced modulo `2^53`. The reduced finalizer is still
/// a bijection, so one generator never repeats an id within `2^53` calls.
/// Two generators only collide when their salted sequences overlap, which
/// for random salts is negligible.
#[derive(Debug)]
pub struct SaltedIdGenerator {
    salt: u64,
    counter: AtomicU64,
}

impl SaltedIdGenerator {
    /// Create a generator with a random salt.
    pub fn new() -> Self {
        Self::with_salt(rand::random())
    }

    /// Create a generator with a fixed salt.
    ///
    /// Only the low 53 bits of `salt` are used.
    pub fn with_salt(salt: u64) -> Self {
        Self {
            salt: salt & MAX_SAFE_ID,
            counter: AtomicU64::new(0),
        }
    }

    /// The salt this generator was seeded with.
    pub fn salt(&self) -> u64 {
        self.salt
    }
}

impl Default for SaltedIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SaltedIdGenerator {
    fn next_id(&self) -> RecordId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        mix53(self.salt.wrapping_add(n))
    }
}

/// Deterministic generator handing out consecutive ids.
///
/// Only unique within one process; meant for tests and scripted hosts that
/// talk to a private remote.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Start at id 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Start at a specific id.
    pub fn starting_at(first: RecordId) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RecordId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// SplitMix64 finalizer on the low 53 bits.
///
/// Xor-shifts and odd multipliers are both invertible modulo `2^53`.
fn mix53(z: u64) -> u64 {
    let mut z = z & MAX_SAFE_ID;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9) & MAX_SAFE_ID;
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb) & MAX_SAFE_ID;
    z ^ (z >> 31)
}
