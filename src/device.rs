//! Hardware abstraction for the transmitter's output line.

/// Logic level of the output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineLevel {
    /// Line driven low (carrier off).
    Low,

    /// Line driven high (carrier on).
    High,
}

/// Trait for abstracting the pulse output hardware.
///
/// Implement this for whatever owns the transmitter's data line (a GPIO pin,
/// a pigpio socket, a recording mock). The encoder only ever writes the line
/// and waits; it never reads it back.
///
/// Pin setup and teardown (claiming the pin, setting its direction, releasing
/// it) belong to the caller that constructs the device, not to this trait.
pub trait PulseDevice {
    /// Hardware error type, surfaced opaquely through
    /// [`TransmitError::Device`](crate::TransmitError::Device).
    type Error;

    /// Drives the output line to `level`.
    ///
    /// Must return once the request is issued; no physical confirmation is
    /// expected. Setting the line to its current level is a no-op.
    fn set_output(&mut self, level: LineLevel) -> Result<(), Self::Error>;

    /// Blocks the calling context for approximately `micros` microseconds.
    ///
    /// Pulse timing is best effort; the encoder computes exact durations but
    /// relies on this method for their realization.
    fn wait(&mut self, micros: u64) -> Result<(), Self::Error>;
}
