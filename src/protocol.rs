//! Fixed registry of named OOK transmission protocols.
//!
//! Each entry describes one remote-control transmission scheme as a base tick
//! unit plus six tick multipliers. The table is compiled-in constant data;
//! ids are 1-based and id 0 never resolves.

/// Timing profile for one transmission scheme.
///
/// All durations are expressed as multiples of [`pulselength`](Self::pulselength):
/// the real duration of e.g. the sync mark is `sync_high * pulselength`
/// microseconds. Every field is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Protocol {
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

const fn protocol(
    pulselength: u32,
    sync_high: u32,
    sync_low: u32,
    zero_high: u32,
    zero_low: u32,
    one_high: u32,
    one_low: u32,
) -> Protocol {
    Protocol {
        pulselength,
        sync_high,
        sync_low,
        zero_high,
        zero_low,
        one_high,
        one_low,
    }
}

static PROTOCOLS: [Protocol; 14] = [
    protocol(450, 1, 31, 1, 3, 3, 1),    // 1
    protocol(350, 32, 40, 1, 2, 3, 1),   // 2
    protocol(670, 15, 52, 3, 3, 5, 1),   // 3
    protocol(320, 36, 1, 1, 2, 2, 1),    // 4
    protocol(365, 18, 1, 3, 2, 1, 3),    // 5
    protocol(380, 1, 6, 1, 3, 3, 1),     // 6
    protocol(450, 23, 1, 1, 2, 2, 1),    // 7
    protocol(270, 36, 1, 1, 2, 2, 1),    // 8
    protocol(650, 1, 10, 1, 2, 2, 1),    // 9
    protocol(500, 6, 14, 1, 2, 2, 1),    // 10
    protocol(100, 30, 71, 4, 11, 9, 6),  // 11
    protocol(200, 30, 7, 16, 7, 16, 3),  // 12
    protocol(150, 2, 62, 1, 6, 6, 1),    // 13
    protocol(250, 1, 10, 1, 2, 2, 1),    // 14
];

/// A protocol id that resolves to no registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidProtocol(pub u8);

impl core::fmt::Display for InvalidProtocol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unsupported protocol {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidProtocol {}

/// Number of registered protocols.
pub const fn count() -> u8 {
    PROTOCOLS.len() as u8
}

/// Resolves a protocol id to its timing profile.
///
/// Ids are 1-based; `resolve(0)` and ids beyond [`count`] fail with
/// [`InvalidProtocol`].
pub fn resolve(id: u8) -> Result<&'static Protocol, InvalidProtocol> {
    if id == 0 || id > count() {
        return Err(InvalidProtocol(id));
    }
    Ok(&PROTOCOLS[(id - 1) as usize])
}

/// All registered protocol ids, in ascending order.
pub fn all_ids() -> impl Iterator<Item = u8> {
    1..=count()
}
