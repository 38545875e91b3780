#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Protocol`**: one transmission scheme as a base pulselength and six tick multipliers,
//!   resolved by id from the compiled-in registry in [`protocol`]
//! - **`Code`**: an integer value plus the bit width it is rendered at, MSB first
//! - **`TimingOverrides`**: per-call replacements for individual protocol fields
//! - **`Transmitter`**: renders sync + bit symbols and drives them out, repeated per send
//! - **`PulseDevice`**: trait to implement for your output hardware
//! - **`WildcardPattern`**: a binary template with `'?'` positions for guided searches
//! - **`search`** (std): exhaustive, random-without-replacement and pattern-guided sweeps
//!   with cooperative cancellation
//!
//! The encoder core is `no_std`; disable default features on embedded targets.

pub mod device;
pub mod pattern;
pub mod protocol;
pub mod transmitter;
pub mod types;

#[cfg(feature = "std")]
pub mod search;

pub use device::{LineLevel, PulseDevice};
pub use pattern::{MAX_PATTERN_BITS, PatternError, WildcardPattern};
pub use protocol::{InvalidProtocol, Protocol};
pub use transmitter::{DEFAULT_REPEAT, DEFAULT_SETTLE_MICROS, TransmitError, Transmitter};
pub use types::{Code, CodeParseError, MAX_CODE_BITS, PulseTimings, TimingOverrides};

#[cfg(feature = "std")]
pub use search::{CancelToken, SearchOutcome, sweep_ascending, sweep_pattern, sweep_random};
