//! Shared test infrastructure for ook-transmitter integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use ook_transmitter::{LineLevel, Protocol, PulseDevice};

// ============================================================================
// Recording Mock Device
// ============================================================================

/// One operation issued to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    Set(LineLevel),
    Wait(u64),
}

/// Mock device that records every line write and wait it is asked to perform.
#[derive(Default)]
pub struct MockDevice {
    pub ops: Vec<DeviceOp>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulses as (level, microseconds) pairs, pairing each line write with
    /// the wait that immediately follows it. Standalone waits (settle and
    /// inter-protocol gaps) are not pulses and are skipped.
    pub fn pulses(&self) -> Vec<(LineLevel, u64)> {
        self.ops
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (DeviceOp::Set(level), DeviceOp::Wait(micros)) => Some((level, micros)),
                _ => None,
            })
            .collect()
    }

    /// Number of line-level writes issued.
    pub fn toggle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DeviceOp::Set(_)))
            .count()
    }

    /// Durations of standalone waits (those not preceded by a line write).
    pub fn bare_waits(&self) -> Vec<u64> {
        let mut out = Vec::new();
        for (i, op) in self.ops.iter().enumerate() {
            if let DeviceOp::Wait(micros) = op {
                let after_set = i > 0 && matches!(self.ops[i - 1], DeviceOp::Set(_));
                if !after_set {
                    out.push(*micros);
                }
            }
        }
        out
    }
}

impl PulseDevice for MockDevice {
    type Error = core::convert::Infallible;

    fn set_output(&mut self, level: LineLevel) -> Result<(), Self::Error> {
        self.ops.push(DeviceOp::Set(level));
        Ok(())
    }

    fn wait(&mut self, micros: u64) -> Result<(), Self::Error> {
        self.ops.push(DeviceOp::Wait(micros));
        Ok(())
    }
}

// ============================================================================
// Failing Device
// ============================================================================

/// Error produced by [`FlakyDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFailure;

impl core::fmt::Display for DeviceFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "injected device failure")
    }
}

impl std::error::Error for DeviceFailure {}

/// Device that fails every operation after the first `ok_budget` succeed.
pub struct FlakyDevice {
    pub ok_budget: usize,
}

impl FlakyDevice {
    pub fn failing_after(ok_budget: usize) -> Self {
        Self { ok_budget }
    }

    fn consume(&mut self) -> Result<(), DeviceFailure> {
        if self.ok_budget == 0 {
            return Err(DeviceFailure);
        }
        self.ok_budget -= 1;
        Ok(())
    }
}

impl PulseDevice for FlakyDevice {
    type Error = DeviceFailure;

    fn set_output(&mut self, _level: LineLevel) -> Result<(), Self::Error> {
        self.consume()
    }

    fn wait(&mut self, _micros: u64) -> Result<(), Self::Error> {
        self.consume()
    }
}

// ============================================================================
// Pulse Sequence Decoding
// ============================================================================

/// Decodes a recorded pulse sequence back into the code values it carried.
///
/// Expects transmissions of `bit_length`-bit codes sent with a single repeat
/// and no overrides: each transmission is one sync symbol followed by one
/// symbol per bit. Panics on malformed sequences so tests fail loudly.
pub fn decode_codes(
    pulses: &[(LineLevel, u64)],
    protocol: &Protocol,
    bit_length: usize,
) -> Vec<u64> {
    assert_eq!(pulses.len() % 2, 0, "dangling half symbol");
    let symbols: Vec<(u64, u64)> = pulses
        .chunks(2)
        .map(|pair| {
            assert_eq!(pair[0].0, LineLevel::High, "symbol must start high");
            assert_eq!(pair[1].0, LineLevel::Low, "symbol must end low");
            (pair[0].1, pair[1].1)
        })
        .collect();

    let pl = u64::from(protocol.pulselength);
    let sync = (u64::from(protocol.sync_high) * pl, u64::from(protocol.sync_low) * pl);
    let zero = (u64::from(protocol.zero_high) * pl, u64::from(protocol.zero_low) * pl);
    let one = (u64::from(protocol.one_high) * pl, u64::from(protocol.one_low) * pl);

    let per_tx = 1 + bit_length;
    assert_eq!(symbols.len() % per_tx, 0, "truncated transmission");

    symbols
        .chunks(per_tx)
        .map(|frame| {
            assert_eq!(frame[0], sync, "transmission must start with sync");
            frame[1..].iter().fold(0u64, |acc, &symbol| {
                let bit = if symbol == zero {
                    0
                } else if symbol == one {
                    1
                } else {
                    panic!("unknown symbol {symbol:?}");
                };
                (acc << 1) | bit
            })
        })
        .collect()
}
