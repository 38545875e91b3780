//! Core types for building transmissions.

use crate::protocol::Protocol;

/// Maximum supported code width in bits.
pub const MAX_CODE_BITS: u8 = 64;

/// A code value together with the bit width used to render it on air.
///
/// The value is rendered most-significant bit first, zero-padded on the left
/// to exactly `bit_length` bits. A code whose value does not fit its bit
/// length is rejected at transmit time rather than silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Code {
    /// Code value.
    pub value: u64,

    /// Number of bits rendered on air.
    pub bit_length: u8,
}

impl Code {
    /// Creates a code. Validity is checked by the transmitter.
    #[inline]
    pub const fn new(value: u64, bit_length: u8) -> Self {
        Self { value, bit_length }
    }

    /// True when the value fits in `bit_length` bits and the width is
    /// supported.
    pub const fn fits(&self) -> bool {
        self.bit_length <= MAX_CODE_BITS
            && (self.bit_length == MAX_CODE_BITS || self.value >> self.bit_length == 0)
    }

    /// Parses a code from a binary digit string; the bit length is the
    /// string's length.
    pub fn from_binary_str(s: &str) -> Result<Self, CodeParseError> {
        if s.is_empty() {
            return Err(CodeParseError::Empty);
        }
        if s.len() > MAX_CODE_BITS as usize {
            return Err(CodeParseError::TooLong(s.len()));
        }

        let mut value = 0u64;
        for ch in s.chars() {
            value <<= 1;
            match ch {
                '0' => {}
                '1' => value |= 1,
                other => return Err(CodeParseError::InvalidDigit(other)),
            }
        }

        Ok(Self::new(value, s.len() as u8))
    }
}

/// Binary code string parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodeParseError {
    /// Empty input string.
    Empty,

    /// More digits than [`MAX_CODE_BITS`].
    TooLong(usize),

    /// A character other than '0' or '1'.
    InvalidDigit(char),
}

impl core::fmt::Display for CodeParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodeParseError::Empty => write!(f, "code string is empty"),
            CodeParseError::TooLong(len) => {
                write!(f, "code string has {len} digits, maximum is {MAX_CODE_BITS}")
            }
            CodeParseError::InvalidDigit(ch) => {
                write!(f, "invalid binary digit {ch:?} in code string")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodeParseError {}

/// Per-call replacements for individual protocol timing fields.
///
/// Each field is either unset (the resolved protocol's value applies) or a
/// positive tick count that fully replaces the protocol field for one
/// transmission. Overrides never mutate the registry. A zero override is
/// rejected at transmit time; "unset" is expressed through `Option`, never a
/// sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingOverrides {
    pulselength: Option<u32>,
    sync_high: Option<u32>,
    sync_low: Option<u32>,
    zero_high: Option<u32>,
    zero_low: Option<u32>,
    one_high: Option<u32>,
    one_low: Option<u32>,
}

impl TimingOverrides {
    /// No overrides; the protocol's own timings apply.
    pub const fn none() -> Self {
        Self {
            pulselength: None,
            sync_high: None,
            sync_low: None,
            zero_high: None,
            zero_low: None,
            one_high: None,
            one_low: None,
        }
    }

    /// Replaces the base tick unit, in microseconds.
    pub const fn pulselength(mut self, micros: u32) -> Self {
        self.pulselength = Some(micros);
        self
    }

    /// Replaces the sync mark tick count.
    pub const fn sync_high(mut self, ticks: u32) -> Self {
        self.sync_high = Some(ticks);
        self
    }

    /// Replaces the sync space tick count.
    pub const fn sync_low(mut self, ticks: u32) -> Self {
        self.sync_low = Some(ticks);
        self
    }

    /// Replaces the zero mark tick count.
    pub const fn zero_high(mut self, ticks: u32) -> Self {
        self.zero_high = Some(ticks);
        self
    }

    /// Replaces the zero space tick count.
    pub const fn zero_low(mut self, ticks: u32) -> Self {
        self.zero_low = Some(ticks);
        self
    }

    /// Replaces the one mark tick count.
    pub const fn one_high(mut self, ticks: u32) -> Self {
        self.one_high = Some(ticks);
        self
    }

    /// Replaces the one space tick count.
    pub const fn one_low(mut self, ticks: u32) -> Self {
        self.one_low = Some(ticks);
        self
    }

    /// Name of the first zero-valued override field, if any.
    pub(crate) fn zeroed_field(&self) -> Option<&'static str> {
        let fields = [
            (self.pulselength, "pulselength"),
            (self.sync_high, "sync_high"),
            (self.sync_low, "sync_low"),
            (self.zero_high, "zero_high"),
            (self.zero_low, "zero_low"),
            (self.one_high, "one_high"),
            (self.one_low, "one_low"),
        ];
        fields
            .into_iter()
            .find(|(value, _)| *value == Some(0))
            .map(|(_, name)| name)
    }

    /// Lays the overrides over a protocol, yielding the effective timings for
    /// one transmission.
    pub fn apply_to(&self, protocol: &Protocol) -> PulseTimings {
        PulseTimings {
            pulselength: self.pulselength.unwrap_or(protocol.pulselength),
            sync_high: self.sync_high.unwrap_or(protocol.sync_high),
            sync_low: self.sync_low.unwrap_or(protocol.sync_low),
            zero_high: self.zero_high.unwrap_or(protocol.zero_high),
            zero_low: self.zero_low.unwrap_or(protocol.zero_low),
            one_high: self.one_high.unwrap_or(protocol.one_high),
            one_low: self.one_low.unwrap_or(protocol.one_low),
        }
    }
}

/// Effective timings for one transmission after overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTimings {
    /// Base tick unit in microseconds.
    pub pulselength: u32,

    /// Sync symbol mark, in ticks.
    pub sync_high: u32,

    /// Sync symbol space, in ticks.
    pub sync_low: u32,

    /// Zero symbol mark, in ticks.
    pub zero_high: u32,

    /// Zero symbol space, in ticks.
    pub zero_low: u32,

    /// One symbol mark, in ticks.
    pub one_high: u32,

    /// One symbol space, in ticks.
    pub one_low: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol;

    #[test]
    fn code_fits_respects_bit_length() {
        assert!(Code::new(0, 0).fits());
        assert!(!Code::new(1, 0).fits());
        assert!(Code::new(15, 4).fits());
        assert!(!Code::new(16, 4).fits());
        assert!(Code::new(u64::MAX, 64).fits());
        assert!(!Code::new(0, 65).fits());
    }

    #[test]
    fn binary_string_parses_msb_first() {
        let code = Code::from_binary_str("0101").unwrap();
        assert_eq!(code, Code::new(5, 4));

        let wide = Code::from_binary_str(&"1".repeat(64)).unwrap();
        assert_eq!(wide, Code::new(u64::MAX, 64));
    }

    #[test]
    fn binary_string_parse_errors() {
        assert_eq!(Code::from_binary_str(""), Err(CodeParseError::Empty));
        assert_eq!(
            Code::from_binary_str(&"0".repeat(65)),
            Err(CodeParseError::TooLong(65))
        );
        assert_eq!(
            Code::from_binary_str("0102"),
            Err(CodeParseError::InvalidDigit('2'))
        );
    }

    #[test]
    fn unset_overrides_fall_back_to_protocol_fields() {
        let p = protocol::resolve(1).unwrap();
        let timings = TimingOverrides::none().apply_to(p);
        assert_eq!(timings.pulselength, p.pulselength);
        assert_eq!(timings.sync_low, p.sync_low);
        assert_eq!(timings.one_high, p.one_high);
    }

    #[test]
    fn set_overrides_replace_only_their_field() {
        let p = protocol::resolve(1).unwrap();
        let timings = TimingOverrides::none()
            .pulselength(100)
            .zero_high(7)
            .apply_to(p);
        assert_eq!(timings.pulselength, 100);
        assert_eq!(timings.zero_high, 7);
        assert_eq!(timings.zero_low, p.zero_low);
        assert_eq!(timings.sync_high, p.sync_high);
    }

    #[test]
    fn zeroed_field_reports_the_offending_override() {
        assert_eq!(TimingOverrides::none().zeroed_field(), None);
        assert_eq!(
            TimingOverrides::none().sync_low(0).zeroed_field(),
            Some("sync_low")
        );
        assert_eq!(
            TimingOverrides::none().one_low(0).zeroed_field(),
            Some("one_low")
        );
    }
}
