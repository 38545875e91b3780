//! Wildcard patterns for guided code-space searches.

use core::str::FromStr;

use heapless::Vec;

/// Maximum pattern width in bits.
pub const MAX_PATTERN_BITS: usize = 64;

/// A fixed-width binary template with free positions.
///
/// Parsed from a string over `{'0', '1', '?'}`: non-`'?'` characters are
/// fixed bits of the target code, `'?'` positions are filled by a search.
/// The leftmost character is the most significant bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    bit_length: u8,
    fixed_bits: u64,
    /// Shift amounts of the '?' positions, leftmost pattern position first.
    positions: Vec<u8, MAX_PATTERN_BITS>,
}

impl WildcardPattern {
    /// Parses a pattern string.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        if s.is_empty() {
            return Err(PatternError::Empty);
        }
        if s.len() > MAX_PATTERN_BITS {
            return Err(PatternError::TooLong(s.len()));
        }

        let len = s.len();
        let mut fixed_bits = 0u64;
        let mut positions: Vec<u8, MAX_PATTERN_BITS> = Vec::new();
        for (i, ch) in s.chars().enumerate() {
            let shift = (len - 1 - i) as u8;
            match ch {
                '0' => {}
                '1' => fixed_bits |= 1u64 << shift,
                // Capacity equals MAX_PATTERN_BITS, so the push cannot fail.
                '?' => {
                    let _ = positions.push(shift);
                }
                other => {
                    return Err(PatternError::InvalidChar {
                        position: i,
                        found: other,
                    });
                }
            }
        }

        Ok(Self {
            bit_length: len as u8,
            fixed_bits,
            positions,
        })
    }

    /// Total pattern width in bits.
    pub fn bit_length(&self) -> u8 {
        self.bit_length
    }

    /// Number of free (`'?'`) positions.
    pub fn num_wildcards(&self) -> u8 {
        self.positions.len() as u8
    }

    /// The fixed `'1'` bits of the pattern, with all free positions zero.
    pub fn fixed_bits(&self) -> u64 {
        self.fixed_bits
    }

    /// Substitutes the low [`num_wildcards`](Self::num_wildcards) bits of
    /// `fill` into the free positions.
    ///
    /// The leftmost free position receives the most significant fill bit, so
    /// `fill` reads like the `'?'`s replaced left to right. Distinct fills
    /// always produce distinct codes.
    pub fn fill(&self, fill: u64) -> u64 {
        let n = self.positions.len();
        let mut value = self.fixed_bits;
        for (i, &shift) in self.positions.iter().enumerate() {
            if (fill >> (n - 1 - i)) & 1 != 0 {
                value |= 1u64 << shift;
            }
        }
        value
    }
}

impl FromStr for WildcardPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Pattern string parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// Empty input string.
    Empty,

    /// More positions than [`MAX_PATTERN_BITS`].
    TooLong(usize),

    /// A character other than '0', '1' or '?'.
    InvalidChar {
        /// Offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::Empty => write!(f, "pattern is empty"),
            PatternError::TooLong(len) => {
                write!(f, "pattern has {len} positions, maximum is {MAX_PATTERN_BITS}")
            }
            PatternError::InvalidChar { position, found } => {
                write!(
                    f,
                    "invalid pattern character {found:?} at position {position} (expected '0', '1' or '?')"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_width_fixed_bits_and_wildcards() {
        let pattern: WildcardPattern = "1?0?".parse().unwrap();
        assert_eq!(pattern.bit_length(), 4);
        assert_eq!(pattern.num_wildcards(), 2);
        assert_eq!(pattern.fixed_bits(), 0b1000);
    }

    #[test]
    fn fill_substitutes_left_to_right() {
        let pattern: WildcardPattern = "1?0?".parse().unwrap();
        assert_eq!(pattern.fill(0b00), 0b1000);
        assert_eq!(pattern.fill(0b01), 0b1001);
        assert_eq!(pattern.fill(0b10), 0b1100);
        assert_eq!(pattern.fill(0b11), 0b1101);
    }

    #[test]
    fn fully_fixed_pattern_has_no_wildcards() {
        let pattern: WildcardPattern = "10110".parse().unwrap();
        assert_eq!(pattern.num_wildcards(), 0);
        assert_eq!(pattern.fill(0), 0b10110);
    }

    #[test]
    fn fully_free_pattern_passes_fill_through() {
        let pattern: WildcardPattern = "????".parse().unwrap();
        assert_eq!(pattern.num_wildcards(), 4);
        assert_eq!(pattern.fill(0b1011), 0b1011);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(WildcardPattern::parse(""), Err(PatternError::Empty));
        assert_eq!(
            WildcardPattern::parse(&"?".repeat(65)),
            Err(PatternError::TooLong(65))
        );
        assert_eq!(
            WildcardPattern::parse("10x1"),
            Err(PatternError::InvalidChar {
                position: 2,
                found: 'x'
            })
        );
    }

    #[test]
    fn widest_pattern_is_accepted() {
        let pattern = WildcardPattern::parse(&"?".repeat(64)).unwrap();
        assert_eq!(pattern.bit_length(), 64);
        assert_eq!(pattern.num_wildcards(), 64);
        assert_eq!(pattern.fill(u64::MAX), u64::MAX);
    }
}
