//! Pulse encoder and transmitter.
//!
//! Provides [`Transmitter`] which renders a [`Code`] into the mark/space
//! pulse train of a registered protocol and drives it out through a
//! [`PulseDevice`]. Encoding is fully deterministic: protocol, overrides,
//! code value and bit length alone decide the emitted sequence.

use crate::device::{LineLevel, PulseDevice};
use crate::protocol::{self, InvalidProtocol};
use crate::types::{Code, TimingOverrides};

/// Default number of repeats per transmission.
pub const DEFAULT_REPEAT: u32 = 10;

/// Default settle delay after each transmission in a broadcast, in
/// microseconds.
pub const DEFAULT_SETTLE_MICROS: u64 = 50_000;

/// Errors that can occur while encoding or emitting a transmission.
///
/// `E` is the output device's opaque error type. Every validation failure is
/// raised before the first pulse goes on air; only [`Device`](Self::Device)
/// can interrupt a sequence mid-emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitError<E> {
    /// Requested protocol id resolves to no registry entry.
    InvalidProtocol(u8),

    /// A supplied timing override was zero.
    InvalidOverride {
        /// Name of the offending override field.
        field: &'static str,
    },

    /// Code value does not fit the stated bit length, or the bit length is
    /// unsupported.
    CodeOutOfRange {
        /// The code value.
        value: u64,
        /// The stated bit length.
        bit_length: u8,
    },

    /// The output device reported a failure.
    Device(E),
}

impl<E> From<InvalidProtocol> for TransmitError<E> {
    fn from(err: InvalidProtocol) -> Self {
        TransmitError::InvalidProtocol(err.0)
    }
}

impl<E: core::fmt::Display> core::fmt::Display for TransmitError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransmitError::InvalidProtocol(id) => {
                write!(f, "unsupported protocol {id}")
            }
            TransmitError::InvalidOverride { field } => {
                write!(f, "timing override {field} must be positive")
            }
            TransmitError::CodeOutOfRange { value, bit_length } => {
                write!(f, "code {value} does not fit in {bit_length} bits")
            }
            TransmitError::Device(err) => {
                write!(f, "output device error: {err}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for TransmitError<E> {}

/// Drives one OOK output line through timed pulse sequences.
///
/// Owns the output device. A transmission is the protocol's sync symbol
/// followed by one zero/one symbol per code bit (most significant first),
/// repeated [`repeat`](Self::repeat) times back to back. Every symbol is a
/// mark (line high) and a space (line low), each held for its tick count
/// times the effective pulselength.
///
/// All waits happen on the calling thread; no two transmissions ever overlap.
pub struct Transmitter<D: PulseDevice> {
    device: D,
    repeat: u32,
    settle_micros: u64,
}

impl<D: PulseDevice> Transmitter<D> {
    /// Creates a transmitter with the default repeat count and settle delay.
    pub fn new(device: D) -> Self {
        Self {
            device,
            repeat: DEFAULT_REPEAT,
            settle_micros: DEFAULT_SETTLE_MICROS,
        }
    }

    /// Sets how many times each transmit call repeats the pulse sequence.
    ///
    /// Values below 1 are clamped to 1.
    pub fn set_repeat(&mut self, repeat: u32) {
        self.repeat = repeat.max(1);
    }

    /// Repeats per transmit call.
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Sets the settle delay inserted after each transmission in a
    /// [`broadcast`](Self::broadcast). Zero disables it.
    pub fn set_settle_micros(&mut self, micros: u64) {
        self.settle_micros = micros;
    }

    /// Settle delay after each broadcast transmission, in microseconds.
    pub fn settle_micros(&self) -> u64 {
        self.settle_micros
    }

    /// Consumes the transmitter and hands the device back.
    pub fn release(self) -> D {
        self.device
    }

    /// Emits one full transmission of `code` with the given protocol.
    ///
    /// Validates the protocol id, the overrides and the code before touching
    /// the device, then emits sync + bit symbols for the configured repeat
    /// count. Two calls with identical inputs produce identical pulse
    /// sequences.
    pub fn transmit(
        &mut self,
        code: Code,
        protocol_id: u8,
        overrides: &TimingOverrides,
    ) -> Result<(), TransmitError<D::Error>> {
        let protocol = protocol::resolve(protocol_id)?;
        if let Some(field) = overrides.zeroed_field() {
            return Err(TransmitError::InvalidOverride { field });
        }
        if !code.fits() {
            return Err(TransmitError::CodeOutOfRange {
                value: code.value,
                bit_length: code.bit_length,
            });
        }

        let timings = overrides.apply_to(protocol);
        for _ in 0..self.repeat {
            self.emit_symbol(timings.sync_high, timings.sync_low, timings.pulselength)?;
            for shift in (0..code.bit_length).rev() {
                if (code.value >> shift) & 1 == 0 {
                    self.emit_symbol(timings.zero_high, timings.zero_low, timings.pulselength)?;
                } else {
                    self.emit_symbol(timings.one_high, timings.one_low, timings.pulselength)?;
                }
            }
        }
        Ok(())
    }

    /// Sends one code once per protocol id, in list order.
    ///
    /// All ids are validated before anything is emitted. After each
    /// transmission the configured settle delay is waited out, followed by
    /// `gap_micros` (the inter-protocol timeout) when non-zero.
    pub fn broadcast(
        &mut self,
        code: Code,
        protocol_ids: &[u8],
        overrides: &TimingOverrides,
        gap_micros: u64,
    ) -> Result<(), TransmitError<D::Error>> {
        for &id in protocol_ids {
            protocol::resolve(id)?;
        }

        for &id in protocol_ids {
            self.transmit(code, id, overrides)?;
            if self.settle_micros > 0 {
                self.device
                    .wait(self.settle_micros)
                    .map_err(TransmitError::Device)?;
            }
            if gap_micros > 0 {
                self.device.wait(gap_micros).map_err(TransmitError::Device)?;
            }
        }
        Ok(())
    }

    fn emit_symbol(
        &mut self,
        high_ticks: u32,
        low_ticks: u32,
        pulselength: u32,
    ) -> Result<(), TransmitError<D::Error>> {
        self.device
            .set_output(LineLevel::High)
            .map_err(TransmitError::Device)?;
        self.device
            .wait(u64::from(high_ticks) * u64::from(pulselength))
            .map_err(TransmitError::Device)?;
        self.device
            .set_output(LineLevel::Low)
            .map_err(TransmitError::Device)?;
        self.device
            .wait(u64::from(low_ticks) * u64::from(pulselength))
            .map_err(TransmitError::Device)?;
        Ok(())
    }
}
