//! Code-space enumeration strategies.
//!
//! Three ways of walking a bounded code space, each handing every generated
//! code to the transmitter once per requested protocol id, in list order and
//! strictly one at a time:
//!
//! - [`sweep_ascending`]: every value of an n-bit space, in ascending order
//! - [`sweep_random`]: the same space as a random permutation, drawn
//!   uniformly with rejection against an exclusion set
//! - [`sweep_pattern`]: every filling of a [`WildcardPattern`]'s free
//!   positions, in random order
//!
//! All strategies check a [`CancelToken`] between codes and report partial
//! completion through [`SearchOutcome`] instead of running unconditionally to
//! exhaustion. A transmit error halts the sweep immediately; no code is ever
//! silently skipped, so a completed sweep has covered its space exactly once.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::RngCore;

use crate::device::PulseDevice;
use crate::pattern::WildcardPattern;
use crate::protocol;
use crate::transmitter::{TransmitError, Transmitter};
use crate::types::{Code, MAX_CODE_BITS, TimingOverrides};

/// Cooperative cancellation flag, checked between codes.
///
/// Clones share the same flag, so a token handed to another thread (or a
/// signal handler) can stop a running sweep at the next code boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Irrevocable for this token's sweep.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a finished or cancelled sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Codes handed to the transmitter, each sent once per protocol id.
    pub codes_sent: u64,

    /// False when the sweep was cancelled before covering its space.
    pub complete: bool,
}

/// Transmits every value of an n-bit code space in ascending order.
///
/// Each value is sent exactly once per protocol id; the sweep terminates
/// after `2^bit_length` codes.
pub fn sweep_ascending<D: PulseDevice>(
    tx: &mut Transmitter<D>,
    bit_length: u8,
    protocol_ids: &[u8],
    overrides: &TimingOverrides,
    cancel: &CancelToken,
) -> Result<SearchOutcome, TransmitError<D::Error>> {
    check_width(bit_length)?;
    validate_ids(protocol_ids)?;

    let space = space_size(bit_length);
    let mut sent = 0u64;
    let mut value = 0u128;
    while value < space {
        if cancel.is_cancelled() {
            return Ok(SearchOutcome {
                codes_sent: sent,
                complete: false,
            });
        }
        tx.broadcast(Code::new(value as u64, bit_length), protocol_ids, overrides, 0)?;
        sent += 1;
        value += 1;
    }

    Ok(SearchOutcome {
        codes_sent: sent,
        complete: true,
    })
}

/// Transmits every value of an n-bit code space in uniformly random order.
///
/// Draws are rejected against an exclusion set, so each value goes on air
/// exactly once and the sweep terminates once the set covers the whole
/// space, yielding a random permutation. Expected draw count is
/// `O(k log k)` for a space of size `k`, acceptable for the intended widths.
pub fn sweep_random<D: PulseDevice, R: RngCore>(
    tx: &mut Transmitter<D>,
    bit_length: u8,
    protocol_ids: &[u8],
    overrides: &TimingOverrides,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<SearchOutcome, TransmitError<D::Error>> {
    check_width(bit_length)?;
    validate_ids(protocol_ids)?;

    let space = space_size(bit_length);
    let mut seen: HashSet<u64> = HashSet::new();
    while (seen.len() as u128) < space {
        if cancel.is_cancelled() {
            return Ok(SearchOutcome {
                codes_sent: seen.len() as u64,
                complete: false,
            });
        }
        let value = random_bits(rng, bit_length);
        if !seen.insert(value) {
            continue;
        }
        tx.broadcast(Code::new(value, bit_length), protocol_ids, overrides, 0)?;
    }

    Ok(SearchOutcome {
        codes_sent: seen.len() as u64,
        complete: true,
    })
}

/// Transmits every distinct filling of a wildcard pattern, in random order.
///
/// The code's bit length is the full pattern width; only the `'?'` positions
/// vary. Terminates after `2^num_wildcards` distinct codes.
pub fn sweep_pattern<D: PulseDevice, R: RngCore>(
    tx: &mut Transmitter<D>,
    pattern: &WildcardPattern,
    protocol_ids: &[u8],
    overrides: &TimingOverrides,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<SearchOutcome, TransmitError<D::Error>> {
    validate_ids(protocol_ids)?;

    let free = pattern.num_wildcards();
    let space = space_size(free);
    let mut seen: HashSet<u64> = HashSet::new();
    while (seen.len() as u128) < space {
        if cancel.is_cancelled() {
            return Ok(SearchOutcome {
                codes_sent: seen.len() as u64,
                complete: false,
            });
        }
        let value = pattern.fill(random_bits(rng, free));
        if !seen.insert(value) {
            continue;
        }
        tx.broadcast(
            Code::new(value, pattern.bit_length()),
            protocol_ids,
            overrides,
            0,
        )?;
    }

    Ok(SearchOutcome {
        codes_sent: seen.len() as u64,
        complete: true,
    })
}

fn check_width<E>(bit_length: u8) -> Result<(), TransmitError<E>> {
    if bit_length > MAX_CODE_BITS {
        return Err(TransmitError::CodeOutOfRange {
            value: 0,
            bit_length,
        });
    }
    Ok(())
}

fn validate_ids<E>(protocol_ids: &[u8]) -> Result<(), TransmitError<E>> {
    for &id in protocol_ids {
        protocol::resolve(id)?;
    }
    Ok(())
}

fn space_size(bit_length: u8) -> u128 {
    1u128 << bit_length
}

/// A uniformly random value of `width` bits.
fn random_bits<R: RngCore>(rng: &mut R, width: u8) -> u64 {
    if width == 0 {
        0
    } else {
        rng.next_u64() >> (64 - u32::from(width))
    }
}
